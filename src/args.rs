use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{Interval, WatchRequest};

pub const COIN_SPEC_PATTERN: &str = r"^([a-zA-Z]+)([0-9]{1,2}[hd])([0-9]+)$";

pub const USAGE: &str = "\
Usage: coin-alert <coin><interval><threshold> [<coin><interval><threshold>...]
       at least one argument <coin><interval><threshold> is expected,
       valid values for interval: 1h, 24h, 7d
       usage example:
       coin-alert burst1h5 bitcoin24h10";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoinSpecError {
    #[error("{0} does not match expected pattern {}", COIN_SPEC_PATTERN)]
    Pattern(String),
    #[error("threshold in {0} is too large")]
    Threshold(String),
}

#[derive(Debug, Default)]
pub struct ParsedArgs {
    pub requests: Vec<WatchRequest>,
    pub rejected: Vec<CoinSpecError>,
    /// `--` prefixed tokens. Accepted and otherwise ignored.
    pub options: Vec<String>,
}

fn coin_spec_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(COIN_SPEC_PATTERN).expect("coin-spec pattern is valid"))
}

pub fn parse_coin_spec(token: &str) -> Result<WatchRequest, CoinSpecError> {
    let caps = coin_spec_regex()
        .captures(token)
        .ok_or_else(|| CoinSpecError::Pattern(token.to_string()))?;

    let threshold = caps[3]
        .parse::<u64>()
        .map_err(|_| CoinSpecError::Threshold(token.to_string()))?;

    Ok(WatchRequest {
        coin: caps[1].to_lowercase(),
        interval: Interval::from_tag(&caps[2]),
        threshold,
    })
}

/// Splits command tokens into watch requests, rejected coin-specs and options.
/// Rejected tokens are reported and skipped.
pub fn parse_args<I, S>(tokens: I) -> ParsedArgs
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parsed = ParsedArgs::default();

    for token in tokens {
        let token = token.as_ref();
        if token.starts_with("--") {
            debug!("Ignoring option {}", token);
            parsed.options.push(token.to_string());
            continue;
        }

        match parse_coin_spec(token) {
            Ok(request) => parsed.requests.push(request),
            Err(e) => {
                warn!("{}", e);
                parsed.rejected.push(e);
            }
        }
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_twenty_four_hour_spec() {
        let request = parse_coin_spec("bitcoin24h10").unwrap();
        assert_eq!(
            request,
            WatchRequest {
                coin: "bitcoin".to_string(),
                interval: Interval::TwentyFourHours,
                threshold: 10,
            }
        );
    }

    #[test]
    fn parses_one_hour_spec() {
        let request = parse_coin_spec("burst1h5").unwrap();
        assert_eq!(request.coin, "burst");
        assert_eq!(request.interval, Interval::OneHour);
        assert_eq!(request.threshold, 5);
    }

    #[test]
    fn lowercases_coin_name() {
        let request = parse_coin_spec("Ethereum7d20").unwrap();
        assert_eq!(request.coin, "ethereum");
        assert_eq!(request.interval, Interval::SevenDays);
    }

    #[test]
    fn keeps_unrecognized_interval_tags() {
        let request = parse_coin_spec("litecoin2h3").unwrap();
        assert_eq!(request.interval, Interval::Unrecognized("2h".to_string()));
    }

    #[test]
    fn zero_threshold_is_accepted() {
        assert_eq!(parse_coin_spec("dogecoin1h0").unwrap().threshold, 0);
    }

    #[test]
    fn rejects_tokens_outside_pattern() {
        for token in ["btc", "eth30m5", "bitcoin123h5", "24h10", "bitcoin24h", "bit-coin1h5"] {
            assert_eq!(
                parse_coin_spec(token),
                Err(CoinSpecError::Pattern(token.to_string())),
                "{token} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_threshold_overflow() {
        let token = "bitcoin1h99999999999999999999999";
        assert_eq!(
            parse_coin_spec(token),
            Err(CoinSpecError::Threshold(token.to_string()))
        );
    }

    #[test]
    fn pattern_error_names_token_and_pattern() {
        let message = CoinSpecError::Pattern("btc".to_string()).to_string();
        assert!(message.starts_with("btc does not match expected pattern"));
        assert!(message.contains(COIN_SPEC_PATTERN));
    }

    #[test]
    fn skips_bad_tokens_and_keeps_going() {
        let parsed = parse_args(["btc", "bitcoin24h10", "eth30m5", "burst1h5"]);
        let coins: Vec<_> = parsed.requests.iter().map(|r| r.coin.as_str()).collect();
        assert_eq!(coins, vec!["bitcoin", "burst"]);
        assert_eq!(parsed.rejected.len(), 2);
    }

    #[test]
    fn filters_double_dash_options() {
        let parsed = parse_args(vec!["--verbose".to_string(), "bitcoin24h10".to_string()]);
        assert_eq!(parsed.options, vec!["--verbose".to_string()]);
        assert_eq!(parsed.requests.len(), 1);
        assert!(parsed.rejected.is_empty());
    }

    #[test]
    fn only_options_leaves_no_requests() {
        let parsed = parse_args(["--dry-run"]);
        assert!(parsed.requests.is_empty());
        assert!(parsed.rejected.is_empty());
    }
}
