use crate::domain::AlertEvent;
use tracing::info;

/// User-facing lines on standard output.
#[derive(Debug, Clone, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }

    pub fn alert(&self, event: &AlertEvent) {
        println!("⚠️  {}", event.headline());
        info!("Alert raised for {} ({})", event.symbol, event.interval);
    }

    pub fn below_threshold(&self, coin: &str) {
        println!("percent_change for {coin} is below threshold, no email will be sent");
    }

    pub fn email_sent(&self) {
        println!("Successfully sent email");
    }

    pub fn email_failed(&self, reason: &str) {
        println!("ERROR: {reason}");
    }
}
