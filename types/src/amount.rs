//! Token amounts.
//!
//! The reward token has 18 decimals; emission rates are raw units per second.

/// One whole token in raw units (10^18).
pub const TOKEN_UNIT: u128 = 1_000_000_000_000_000_000;

/// `n` whole tokens expressed in raw units.
///
/// Saturates at `u128::MAX` instead of overflowing.
pub fn tokens(n: u128) -> u128 {
    n.saturating_mul(TOKEN_UNIT)
}

/// Parse a raw amount written as digits (underscores allowed) or as an
/// integer mantissa with a decimal exponent, e.g. `"25e18"`.
pub fn parse_raw(s: &str) -> Result<u128, String> {
    let cleaned: String = s.trim().chars().filter(|c| *c != '_').collect();
    let (mantissa, exponent) = match cleaned.split_once(['e', 'E']) {
        Some((m, e)) => (m, e.parse::<u32>().map_err(|e| format!("bad exponent: {e}"))?),
        None => (cleaned.as_str(), 0),
    };
    let mantissa = mantissa
        .parse::<u128>()
        .map_err(|e| format!("bad amount {s:?}: {e}"))?;
    10u128
        .checked_pow(exponent)
        .and_then(|scale| mantissa.checked_mul(scale))
        .ok_or_else(|| format!("amount {s:?} overflows u128"))
}

/// Serde adapter for `u128` amounts.
///
/// TOML and JSON cannot carry integers above `i64::MAX`, so human-readable
/// formats get a string (integers are still accepted on input). Binary
/// formats keep the native `u128`.
pub mod raw_text {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.collect_str(value)
        } else {
            serializer.serialize_u128(*value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        if !deserializer.is_human_readable() {
            return u128::deserialize(deserializer);
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Text {
            Int(u64),
            Str(String),
        }

        match Text::deserialize(deserializer)? {
            Text::Int(n) => Ok(n as u128),
            Text::Str(s) => super::parse_raw(&s).map_err(de::Error::custom),
        }
    }
}
