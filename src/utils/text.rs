use serde_json::Value;

/// Value that survived sanitization.
#[derive(Debug, Clone, PartialEq)]
pub enum Sanitized {
    Number(f64),
    Text(String),
}

impl Sanitized {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Sanitized::Number(value) => Some(*value),
            Sanitized::Text(_) => None,
        }
    }
}

/// Clean a JSON value for display or storage.
///
/// Finite numbers pass through untouched, strings lose any markup and control
/// characters, and everything else (null, bools, arrays, objects) is rejected.
pub fn sanitize(value: &Value) -> Option<Sanitized> {
    match value {
        Value::Number(number) => number
            .as_f64()
            .filter(|parsed| parsed.is_finite())
            .map(Sanitized::Number),
        Value::String(text) => {
            let cleaned = sanitize_text(text);
            if cleaned.is_empty() {
                None
            } else {
                Some(Sanitized::Text(cleaned))
            }
        }
        _ => None,
    }
}

/// Strip tags and control characters, collapsing whitespace into single spaces.
pub fn sanitize_text(raw: &str) -> String {
    let mut stripped = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    let mut in_tag = false;

    while let Some(ch) = chars.next() {
        if in_tag {
            if ch == '>' {
                in_tag = false;
            }
            continue;
        }

        match ch {
            '<' if matches!(chars.peek(), Some(next) if next.is_ascii_alphabetic() || *next == '/' || *next == '!') =>
            {
                in_tag = true;
            }
            c if c.is_control() => stripped.push(' '),
            c => stripped.push(c),
        }
    }

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Format a price with thousands separators and two decimals, e.g. `50,000.00`.
pub fn format_amount(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (whole, fraction) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted != "0.00" {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{fraction}")
}
