mod console;
mod email;
pub mod render;

pub use console::ConsoleNotifier;
pub use email::{EmailNotifier, RelayTransport};
pub use render::Section;

use std::fmt;

use lettre::AsyncTransport;
use tracing::{error, info};

use crate::domain::{AlertEvent, TickerSnapshot};

/// Everything one run accumulates for the outgoing email: a rendered section
/// per coin processed and the alerts in processing order.
#[derive(Debug, Clone, Default)]
pub struct AlertDigest {
    sections: Vec<Section>,
    events: Vec<AlertEvent>,
}

impl AlertDigest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_snapshot(&mut self, snapshot: &TickerSnapshot) {
        self.sections.push(render::render_section(snapshot));
    }

    pub fn record(&mut self, event: AlertEvent) {
        self.events.push(event);
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn events(&self) -> &[AlertEvent] {
        &self.events
    }

    pub fn has_alerts(&self) -> bool {
        !self.events.is_empty()
    }

    /// Headlines of every alert run together, e.g.
    /// `BTC is UP 12 % in 24h...ETH is DOWN 7 % in 7d...`
    pub fn subject(&self) -> String {
        self.events.iter().map(AlertEvent::headline).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// No coin crossed its threshold; nothing was sent.
    Skipped,
    Sent,
    Failed(String),
}

pub struct NotifierHub<T = RelayTransport> {
    console: ConsoleNotifier,
    email: EmailNotifier<T>,
}

impl<T> NotifierHub<T>
where
    T: AsyncTransport + Sync,
    T::Error: fmt::Display,
{
    pub fn new(console: ConsoleNotifier, email: EmailNotifier<T>) -> Self {
        Self { console, email }
    }

    pub fn console(&self) -> &ConsoleNotifier {
        &self.console
    }

    pub fn email(&self) -> &EmailNotifier<T> {
        &self.email
    }

    /// Sends the digest if it holds at least one alert. Delivery failures are
    /// logged and reported, never propagated.
    pub async fn deliver(&self, digest: &AlertDigest) -> Delivery {
        if !digest.has_alerts() {
            info!("No coin crossed its threshold, no email sent");
            return Delivery::Skipped;
        }

        match self.email.send(digest).await {
            Ok(()) => {
                info!(
                    "Alert email sent for {} coin(s): {}",
                    digest.events().len(),
                    digest.subject()
                );
                self.console.email_sent();
                Delivery::Sent
            }
            Err(e) => {
                error!("Email notification failed: {:#}", e);
                self.console.email_failed(&format!("{e:#}"));
                Delivery::Failed(format!("{e:#}"))
            }
        }
    }
}
