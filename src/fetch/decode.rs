use serde_json::Value;

use crate::error::FetchError;
use crate::utils::{sanitize, sanitize_text};

use super::{FetchResult, QuotePair};

/// Parse a `simple/price` style body: `{ "<id>": { "<currency>": <number> } }`.
///
/// Both prices must be present and numeric; a half-valid body is rejected whole.
pub fn decode_quote_pair(body: &str, ids: [&str; 2], vs_currency: &str) -> FetchResult<QuotePair> {
    let root: Value = serde_json::from_str(body).map_err(|err| {
        FetchError::Protocol(sanitize_text(&format!("response body is not JSON: {err}")))
    })?;

    let first = extract_price(&root, ids[0], vs_currency)?;
    let second = extract_price(&root, ids[1], vs_currency)?;
    Ok((first, second))
}

fn extract_price(root: &Value, id: &str, vs_currency: &str) -> FetchResult<f64> {
    let raw = root
        .get(id)
        .and_then(|entry| entry.get(vs_currency))
        .ok_or_else(|| {
            FetchError::MissingData(sanitize_text(&format!("no {vs_currency} price for {id}")))
        })?;

    sanitize(raw)
        .and_then(|value| value.as_number())
        .ok_or_else(|| {
            FetchError::MissingData(sanitize_text(&format!(
                "{vs_currency} price for {id} is not numeric"
            )))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDS: [&str; 2] = ["bitcoin", "ethereum"];

    #[test]
    fn decodes_both_prices_in_order() {
        let body = r#"{"ethereum":{"usd":3000.25},"bitcoin":{"usd":50000}}"#;
        let (btc, eth) = decode_quote_pair(body, IDS, "usd").expect("valid body");
        assert!((btc - 50000.0).abs() < 1e-9);
        assert!((eth - 3000.25).abs() < 1e-9);
    }

    #[test]
    fn missing_instrument_is_missing_data() {
        let body = r#"{"bitcoin":{"usd":50000}}"#;
        let err = decode_quote_pair(body, IDS, "usd").expect_err("ethereum missing");
        assert!(matches!(err, FetchError::MissingData(ref msg) if msg.contains("ethereum")));
    }

    #[test]
    fn missing_currency_is_missing_data() {
        let body = r#"{"bitcoin":{"eur":46000},"ethereum":{"usd":3000}}"#;
        let err = decode_quote_pair(body, IDS, "usd").expect_err("usd missing");
        assert!(matches!(err, FetchError::MissingData(_)));
    }

    #[test]
    fn non_numeric_values_are_missing_data() {
        for bad in [r#""50000""#, "null", "true", r#"{"v":1}"#, r#""<b>1</b>""#] {
            let body = format!(r#"{{"bitcoin":{{"usd":{bad}}},"ethereum":{{"usd":3000}}}}"#);
            let err = decode_quote_pair(&body, IDS, "usd").expect_err("not numeric");
            assert!(matches!(err, FetchError::MissingData(_)), "{bad}: {err:?}");
        }
    }

    #[test]
    fn non_json_body_is_protocol_error() {
        let err = decode_quote_pair("<html>rate limited</html>", IDS, "usd")
            .expect_err("not json");
        match err {
            FetchError::Protocol(message) => {
                assert!(!message.contains('<'), "message not sanitized: {message}")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn array_body_is_missing_data() {
        let err = decode_quote_pair("[]", IDS, "usd").expect_err("wrong shape");
        assert!(matches!(err, FetchError::MissingData(_)));
    }
}
