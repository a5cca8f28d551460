use std::future::Future;

use log::debug;
use reqwest::{header::HeaderMap, Client};

use crate::config::TrackerConfig;
use crate::error::{FetchError, Result};
use crate::utils::sanitize_text;

use super::{decode_quote_pair, FetchResult, QuotePair, QuoteSource};

/// Issues one bounded-timeout `simple/price` request per call. Never retries.
pub struct QuoteFetcher {
    client: Client,
    endpoint: String,
    ids: [String; 2],
    ids_param: String,
    vs_currency: String,
}

impl QuoteFetcher {
    pub fn new(config: &TrackerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: &TrackerConfig, client: Client) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            ids: config
                .instruments
                .clone()
                .map(|instrument| instrument.api_id),
            ids_param: config.ids_param(),
            vs_currency: config.vs_currency.clone(),
        }
    }

    pub async fn fetch_quotes(&self) -> FetchResult<QuotePair> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("ids", self.ids_param.as_str()),
                ("vs_currencies", self.vs_currency.as_str()),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        log_sanitized_headers(response.headers());

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Protocol(sanitize_text(&format!(
                "quote request returned status {status}"
            ))));
        }

        let body = response.text().await.map_err(transport_error)?;
        decode_quote_pair(&body, [self.ids[0].as_str(), self.ids[1].as_str()], &self.vs_currency)
    }
}

impl QuoteSource for QuoteFetcher {
    fn fetch(&self) -> impl Future<Output = FetchResult<QuotePair>> + Send {
        self.fetch_quotes()
    }
}

fn transport_error(err: reqwest::Error) -> FetchError {
    let kind = if err.is_timeout() {
        "request timed out"
    } else if err.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };
    FetchError::Transport(sanitize_text(&format!("{kind}: {err}")))
}

fn log_sanitized_headers(headers: &HeaderMap) {
    let cleaned = headers
        .iter()
        .filter_map(|(name, value)| {
            let value = value.to_str().ok().map(sanitize_text)?;
            Some(format!("{}={}", sanitize_text(name.as_str()), value))
        })
        .collect::<Vec<_>>();
    debug!("Quote response headers: {}", cleaned.join("; "));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    /// Serve exactly one connection with a canned response and return its URL.
    fn serve_once(response: String, hold: Duration) -> String {
        serve_once_recording(response, hold).0
    }

    /// Like `serve_once`, also handing back the raw request head the server saw.
    fn serve_once_recording(
        response: String,
        hold: Duration,
    ) -> (String, mpsc::Receiver<String>) {
        let (request_tx, request_rx) = mpsc::channel();
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
        let addr = listener.local_addr().expect("listener addr");

        thread::spawn(move || {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|window| window == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(size) => request.extend_from_slice(&buf[..size]),
                }
            }
            let _ = request_tx.send(String::from_utf8_lossy(&request).into_owned());
            thread::sleep(hold);
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        });

        (format!("http://{addr}/api/v3/simple/price"), request_rx)
    }

    fn fetcher_for(endpoint: String, timeout: Duration) -> QuoteFetcher {
        let mut config = TrackerConfig::builtin();
        config.endpoint = endpoint;
        let client = Client::builder()
            .no_proxy()
            .timeout(timeout)
            .build()
            .expect("test client");
        QuoteFetcher::with_client(&config, client)
    }

    #[tokio::test]
    async fn fetches_both_prices() {
        let body = r#"{"bitcoin":{"usd":50000.0},"ethereum":{"usd":3000.0}}"#;
        let url = serve_once(http_response("200 OK", body), Duration::ZERO);
        let fetcher = fetcher_for(url, Duration::from_secs(5));

        let (btc, eth) = fetcher.fetch().await.expect("quotes");
        assert!((btc - 50000.0).abs() < 1e-9);
        assert!((eth - 3000.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn request_carries_configured_ids_and_currency() {
        let body = r#"{"bitcoin":{"usd":1.0},"ethereum":{"usd":2.0}}"#;
        let (url, requests) = serve_once_recording(http_response("200 OK", body), Duration::ZERO);
        let fetcher = fetcher_for(url, Duration::from_secs(5));

        fetcher.fetch().await.expect("quotes");
        let request = requests.recv().expect("request head");
        let request_line = request.lines().next().unwrap_or_default();
        assert!(
            request_line.contains("ids=bitcoin%2Cethereum&vs_currencies=usd"),
            "{request_line}"
        );
    }

    #[test]
    fn invalid_user_agent_is_a_client_error() {
        let mut config = TrackerConfig::builtin();
        config.user_agent = "price-ticker\nbroken".to_string();
        assert!(matches!(QuoteFetcher::new(&config), Err(AppError::Reqwest(_))));
    }

    #[tokio::test]
    async fn error_status_is_protocol_error() {
        let url = serve_once(
            http_response("429 Too Many Requests", r#"{"status":"throttled"}"#),
            Duration::ZERO,
        );
        let fetcher = fetcher_for(url, Duration::from_secs(5));

        let err = fetcher.fetch().await.expect_err("throttled");
        assert!(matches!(err, FetchError::Protocol(ref msg) if msg.contains("429")), "{err:?}");
    }

    #[tokio::test]
    async fn partial_body_is_missing_data() {
        let body = r#"{"bitcoin":{"usd":50000.0},"ethereum":{}}"#;
        let url = serve_once(http_response("200 OK", body), Duration::ZERO);
        let fetcher = fetcher_for(url, Duration::from_secs(5));

        let err = fetcher.fetch().await.expect_err("eth missing");
        assert!(matches!(err, FetchError::MissingData(_)), "{err:?}");
    }

    #[tokio::test]
    async fn slow_server_is_transport_error() {
        let body = r#"{"bitcoin":{"usd":1},"ethereum":{"usd":1}}"#;
        let url = serve_once(http_response("200 OK", body), Duration::from_secs(2));
        let fetcher = fetcher_for(url, Duration::from_millis(200));

        let err = fetcher.fetch().await.expect_err("timed out");
        assert!(matches!(err, FetchError::Transport(_)), "{err:?}");
    }

    #[tokio::test]
    async fn refused_connection_is_transport_error() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
            listener.local_addr().expect("addr").port()
        };
        let fetcher = fetcher_for(
            format!("http://127.0.0.1:{port}/api/v3/simple/price"),
            Duration::from_secs(2),
        );

        let err = fetcher.fetch().await.expect_err("nothing listening");
        assert!(matches!(err, FetchError::Transport(_)), "{err:?}");
    }
}
