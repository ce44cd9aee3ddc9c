use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use serde_json::Value;

/// Time window a percent change is measured over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interval {
    OneHour,
    TwentyFourHours,
    SevenDays,
    /// A tag the coin-spec pattern admits but the ticker has no field for,
    /// e.g. `2h` or `30d`. Evaluates to a zero percent change.
    Unrecognized(String),
}

impl Interval {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "1h" => Interval::OneHour,
            "24h" => Interval::TwentyFourHours,
            "7d" => Interval::SevenDays,
            other => Interval::Unrecognized(other.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Interval::OneHour => "1h",
            Interval::TwentyFourHours => "24h",
            Interval::SevenDays => "7d",
            Interval::Unrecognized(tag) => tag,
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One coin to watch, parsed from a coin-spec such as `bitcoin24h10`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchRequest {
    pub coin: String,
    pub interval: Interval,
    pub threshold: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => f.write_str("UP"),
            Direction::Down => f.write_str("DOWN"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertEvent {
    pub symbol: String,
    pub direction: Direction,
    /// Absolute percent change.
    pub magnitude: f64,
    pub interval: Interval,
}

impl AlertEvent {
    /// One alert's share of the email subject: `BTC is UP 12 % in 24h...`.
    /// The magnitude is truncated toward zero.
    pub fn headline(&self) -> String {
        format!(
            "{} is {} {} % in {}...",
            self.symbol,
            self.direction,
            self.magnitude.trunc() as i64,
            self.interval
        )
    }
}

/// Market data for one coin as returned by the ticker endpoint.
///
/// The upstream encodes most numbers as strings; both forms are accepted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TickerSnapshot {
    pub id: String,
    pub name: String,
    pub symbol: String,
    #[serde(deserialize_with = "de::number")]
    pub rank: u32,
    #[serde(deserialize_with = "de::number")]
    pub price_usd: f64,
    #[serde(deserialize_with = "de::number")]
    pub price_btc: f64,
    #[serde(rename = "24h_volume_usd", deserialize_with = "de::number")]
    pub volume_usd_24h: f64,
    #[serde(deserialize_with = "de::number")]
    pub market_cap_usd: f64,
    #[serde(deserialize_with = "de::number")]
    pub available_supply: f64,
    #[serde(deserialize_with = "de::number")]
    pub total_supply: f64,
    #[serde(deserialize_with = "de::optional_number")]
    pub max_supply: Option<f64>,
    #[serde(deserialize_with = "de::number")]
    pub percent_change_1h: f64,
    #[serde(deserialize_with = "de::number")]
    pub percent_change_24h: f64,
    #[serde(deserialize_with = "de::number")]
    pub percent_change_7d: f64,
    #[serde(deserialize_with = "de::number")]
    pub last_updated: i64,
    /// Upstream text of each scalar field, kept for display.
    #[serde(skip)]
    raw: HashMap<String, String>,
}

impl TickerSnapshot {
    /// Decodes one ticker record and keeps the upstream text of its fields,
    /// so `"1.0"` can be shown as sent rather than as the parsed `1`.
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        let raw = match &value {
            Value::Object(fields) => fields
                .iter()
                .filter_map(|(key, field)| match field {
                    Value::String(text) => Some((key.clone(), text.clone())),
                    Value::Number(n) => Some((key.clone(), n.to_string())),
                    _ => None,
                })
                .collect(),
            _ => HashMap::new(),
        };

        let mut snapshot: TickerSnapshot = serde_json::from_value(value)?;
        snapshot.raw = raw;
        Ok(snapshot)
    }

    /// The field as the upstream sent it, if the snapshot came from `from_json`.
    pub fn raw(&self, field: &str) -> Option<&str> {
        self.raw.get(field).map(String::as_str)
    }
}

mod de {
    use std::str::FromStr;

    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(serde_json::Number),
        Text(String),
    }

    impl Raw {
        fn parse<T: FromStr, E: Error>(self) -> Result<T, E> {
            let text = match self {
                Raw::Number(n) => n.to_string(),
                Raw::Text(s) => s,
            };
            text.trim()
                .parse()
                .map_err(|_| E::custom(format!("expected a number, got {text:?}")))
        }
    }

    pub fn number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr,
    {
        Raw::deserialize(deserializer)?.parse()
    }

    pub fn optional_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr,
    {
        Option::<Raw>::deserialize(deserializer)?
            .map(|raw| raw.parse::<T, D::Error>())
            .transpose()
    }
}
