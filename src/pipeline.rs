use std::fmt;

use anyhow::Result;
use lettre::AsyncTransport;
use tracing::{error, info};

use crate::alert::AlertEngine;
use crate::config::AppConfig;
use crate::domain::{AlertEvent, WatchRequest};
use crate::notifier::{
    AlertDigest, ConsoleNotifier, Delivery, EmailNotifier, NotifierHub, RelayTransport,
};
use crate::price::{FetchError, TickerProvider};

#[derive(Debug)]
pub enum CoinOutcome {
    Alert(AlertEvent),
    BelowThreshold,
    /// The ticker could not be fetched; the remaining coins are still evaluated.
    Failed(FetchError),
}

#[derive(Debug)]
pub struct CoinReport {
    pub request: WatchRequest,
    pub outcome: CoinOutcome,
}

#[derive(Debug)]
pub struct RunReport {
    pub coins: Vec<CoinReport>,
    pub delivery: Delivery,
}

impl RunReport {
    pub fn alerts(&self) -> impl Iterator<Item = &AlertEvent> {
        self.coins.iter().filter_map(|c| match &c.outcome {
            CoinOutcome::Alert(event) => Some(event),
            _ => None,
        })
    }

    pub fn failures(&self) -> usize {
        self.coins
            .iter()
            .filter(|c| matches!(c.outcome, CoinOutcome::Failed(_)))
            .count()
    }
}

/// Fetch, evaluate and notify, one coin after another.
pub struct AlertPipeline<T = RelayTransport> {
    alert_engine: AlertEngine,
    price_provider: TickerProvider,
    notifier: NotifierHub<T>,
}

impl AlertPipeline<RelayTransport> {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let email = EmailNotifier::from_config(config)?;
        let notifier = NotifierHub::new(ConsoleNotifier::new(), email);
        Ok(Self::new(
            AlertEngine::new(),
            TickerProvider::from_config(config),
            notifier,
        ))
    }
}

impl<T> AlertPipeline<T>
where
    T: AsyncTransport + Sync,
    T::Error: fmt::Display,
{
    pub fn new(
        alert_engine: AlertEngine,
        price_provider: TickerProvider,
        notifier: NotifierHub<T>,
    ) -> Self {
        Self {
            alert_engine,
            price_provider,
            notifier,
        }
    }

    pub fn notifier(&self) -> &NotifierHub<T> {
        &self.notifier
    }

    pub async fn run(&self, requests: &[WatchRequest]) -> RunReport {
        let mut digest = AlertDigest::new();
        let mut coins = Vec::with_capacity(requests.len());

        for request in requests {
            let outcome = match self.price_provider.fetch_ticker(&request.coin).await {
                Ok(snapshot) => {
                    info!(
                        "💰 {} at ${} (watching {} for {}%)",
                        snapshot.symbol, snapshot.price_usd, request.interval, request.threshold
                    );
                    digest.add_snapshot(&snapshot);

                    match self.alert_engine.evaluate(request, &snapshot) {
                        Some(event) => {
                            self.notifier.console().alert(&event);
                            digest.record(event.clone());
                            CoinOutcome::Alert(event)
                        }
                        None => {
                            self.notifier.console().below_threshold(&request.coin);
                            CoinOutcome::BelowThreshold
                        }
                    }
                }
                Err(e) => {
                    error!("⚠️  Skipping {}: {}", request.coin, e);
                    CoinOutcome::Failed(e)
                }
            };

            coins.push(CoinReport {
                request: request.clone(),
                outcome,
            });
        }

        let delivery = self.notifier.deliver(&digest).await;
        RunReport { coins, delivery }
    }
}
