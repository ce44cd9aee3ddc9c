use thiserror::Error;
use tracing::debug;

use crate::config::AppConfig;
use crate::domain::TickerSnapshot;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request for {coin} failed: {source}")]
    Http {
        coin: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("ticker endpoint returned {status} for {coin}")]
    Status {
        coin: String,
        status: reqwest::StatusCode,
    },
    #[error("could not decode ticker for {coin}: {source}")]
    Decode {
        coin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("ticker endpoint returned no record for {coin}")]
    Empty { coin: String },
}

pub struct TickerProvider {
    client: reqwest::Client,
    base_url: String,
}

impl TickerProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.ticker_url.clone())
    }

    pub fn ticker_url(&self, coin: &str) -> String {
        format!("{}/{}/", self.base_url.trim_end_matches('/'), coin)
    }

    /// Fetches the ticker record for `coin`. The endpoint answers with a JSON
    /// array whose first element is the record.
    pub async fn fetch_ticker(&self, coin: &str) -> Result<TickerSnapshot, FetchError> {
        let url = self.ticker_url(coin);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| FetchError::Http {
                coin: coin.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                coin: coin.to_string(),
                status,
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Http {
            coin: coin.to_string(),
            source,
        })?;

        parse_ticker_body(coin, &body)
    }
}

fn parse_ticker_body(coin: &str, body: &str) -> Result<TickerSnapshot, FetchError> {
    let decode = |source: serde_json::Error| FetchError::Decode {
        coin: coin.to_string(),
        source,
    };

    let records: Vec<serde_json::Value> = serde_json::from_str(body).map_err(decode)?;
    let first = records.into_iter().next().ok_or_else(|| FetchError::Empty {
        coin: coin.to_string(),
    })?;

    TickerSnapshot::from_json(first).map_err(decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures;

    #[test]
    fn builds_ticker_url_with_trailing_slash() {
        let provider = TickerProvider::new("https://api.coinmarketcap.com/v1/ticker/");
        assert_eq!(
            provider.ticker_url("bitcoin"),
            "https://api.coinmarketcap.com/v1/ticker/bitcoin/"
        );
    }

    #[test]
    fn parses_first_record() {
        let body = serde_json::json!([fixtures::bitcoin_json()]).to_string();
        let snapshot = parse_ticker_body("bitcoin", &body).unwrap();
        assert_eq!(snapshot, fixtures::bitcoin());
        assert_eq!(snapshot.raw("price_btc"), Some("1.0"));
    }

    #[test]
    fn empty_array_is_an_error() {
        let err = parse_ticker_body("bitcoin", "[]").unwrap_err();
        assert!(matches!(err, FetchError::Empty { .. }));
    }

    #[test]
    fn non_array_body_is_a_decode_error() {
        let err = parse_ticker_body("nocoin", r#"{"error": "id not found"}"#).unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
        assert!(err.to_string().contains("nocoin"));
    }

    mod integration_tests {
        use super::super::*;
        use crate::domain::fixtures;
        use mockito::Server;

        #[tokio::test]
        async fn fetches_ticker_from_endpoint() {
            let mut server = Server::new_async().await;
            let body = serde_json::json!([fixtures::bitcoin_json()]).to_string();

            let mock = server
                .mock("GET", "/v1/ticker/bitcoin/")
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_body(body)
                .create_async()
                .await;

            let provider = TickerProvider::new(format!("{}/v1/ticker", server.url()));
            let snapshot = provider.fetch_ticker("bitcoin").await.unwrap();

            assert_eq!(snapshot.symbol, "BTC");
            assert_eq!(snapshot.percent_change_24h, 12.5);
            mock.assert_async().await;
        }

        #[tokio::test]
        async fn not_found_is_a_status_error() {
            let mut server = Server::new_async().await;

            let _mock = server
                .mock("GET", "/v1/ticker/nocoin/")
                .with_status(404)
                .with_header("content-type", "application/json")
                .with_body(r#"{"error": "id not found"}"#)
                .create_async()
                .await;

            let provider = TickerProvider::new(format!("{}/v1/ticker", server.url()));
            let err = provider.fetch_ticker("nocoin").await.unwrap_err();

            match err {
                FetchError::Status { status, .. } => assert_eq!(status.as_u16(), 404),
                other => panic!("expected status error, got {other:?}"),
            }
        }

        #[tokio::test]
        async fn malformed_json_is_a_decode_error() {
            let mut server = Server::new_async().await;

            let _mock = server
                .mock("GET", "/v1/ticker/bitcoin/")
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_body("not json at all")
                .create_async()
                .await;

            let provider = TickerProvider::new(format!("{}/v1/ticker", server.url()));
            let err = provider.fetch_ticker("bitcoin").await.unwrap_err();

            assert!(matches!(err, FetchError::Decode { .. }));
        }

        #[tokio::test]
        async fn unreachable_endpoint_is_an_http_error() {
            let provider = TickerProvider::new("http://127.0.0.1:1");
            let err = provider.fetch_ticker("bitcoin").await.unwrap_err();

            assert!(matches!(err, FetchError::Http { .. }));
        }
    }
}
