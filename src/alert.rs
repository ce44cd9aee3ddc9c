use crate::domain::{AlertEvent, Direction, Interval, TickerSnapshot, WatchRequest};
use tracing::warn;

/// Percent change of `snapshot` over `interval`. Unrecognized intervals read as zero.
pub fn percent_change(interval: &Interval, snapshot: &TickerSnapshot) -> f64 {
    match interval {
        Interval::OneHour => snapshot.percent_change_1h,
        Interval::TwentyFourHours => snapshot.percent_change_24h,
        Interval::SevenDays => snapshot.percent_change_7d,
        Interval::Unrecognized(tag) => {
            warn!(
                "No ticker field for interval {} on {}, treating change as 0%",
                tag, snapshot.id
            );
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AlertEngine;

impl AlertEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate(&self, request: &WatchRequest, snapshot: &TickerSnapshot) -> Option<AlertEvent> {
        let change = percent_change(&request.interval, snapshot);

        if change.abs() >= request.threshold as f64 {
            let direction = if change > 0.0 {
                Direction::Up
            } else {
                Direction::Down
            };
            Some(AlertEvent {
                symbol: snapshot.symbol.clone(),
                direction,
                magnitude: change.abs(),
                interval: request.interval.clone(),
            })
        } else {
            None
        }
    }
}
