//! Currency helpers for the đồng, which has no minor unit.
//!
//! Amounts are plain non-negative integers everywhere in the workspace. The
//! persisted documents and the admin forms carry them as display strings with
//! a period as thousands separator (`1.234.567`), so both directions live here.

/// Amount of money in đồng.
pub type Dong = u64;

/// Format an amount with `.` as thousands separator.
pub fn format_dong(amount: Dong) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }

    out
}

/// Lenient parse: every non-digit character is dropped before parsing.
///
/// Yields 0 when nothing numeric is left or the digits overflow.
pub fn parse_dong(input: &str) -> Dong {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

/// Strict parse used for form input: surrounding whitespace is allowed,
/// anything else that is not a digit is rejected.
pub fn parse_whole_number(input: &str) -> Option<u64> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}

/// Serde adapter for amounts stored as formatted strings.
///
/// Accepts either a JSON string (parsed leniently) or a JSON number on the
/// way in and always writes the formatted string back out.
pub mod dong_string {
    use super::{format_dong, parse_dong, Dong};
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
        Other(serde_json::Value),
    }

    pub fn serialize<S>(amount: &Dong, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_dong(*amount))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Dong, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => n,
            Raw::Text(s) => parse_dong(&s),
            Raw::Other(_) => 0,
        })
    }
}
