/// Raw ledger record normalization
///
/// Records read back from the contract arrive with numeric fields in whichever
/// representation the underlying call path produced: a plain JSON number, a
/// decimal big-integer string, a `0x`-prefixed hex string, or the legacy
/// `{"_hex": "0x..."}` object. Normalization handles each shape explicitly and
/// turns anything else into a typed error instead of coercing to zero.
use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Scale between the on-chain integer amount and the display amount.
pub const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// A numeric field as it arrives off the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawScalar {
    Number(u64),
    HexObject {
        #[serde(rename = "_hex")]
        hex: String,
    },
    Text(String),
}

impl RawScalar {
    /// Resolve the scalar to its integer value, whatever shape it arrived in.
    pub fn normalize(&self, field: &'static str) -> Result<u128, SessionError> {
        match self {
            RawScalar::Number(n) => Ok(u128::from(*n)),
            RawScalar::HexObject { hex } => parse_hex(hex).ok_or_else(|| {
                SessionError::Unparseable {
                    field,
                    raw: hex.clone(),
                }
            }),
            RawScalar::Text(text) => {
                let trimmed = text.trim();
                if let Some(value) = parse_hex(trimmed) {
                    Ok(value)
                } else if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
                    trimmed.parse::<u128>().map_err(|_| SessionError::Unparseable {
                        field,
                        raw: text.clone(),
                    })
                } else {
                    Err(SessionError::Unparseable {
                        field,
                        raw: text.clone(),
                    })
                }
            }
        }
    }
}

fn parse_hex(s: &str) -> Option<u128> {
    let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))?;
    if digits.is_empty() {
        return None;
    }
    u128::from_str_radix(digits, 16).ok()
}

/// A ledger record exactly as the contract serves it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    pub sender: String,
    pub receiver: String,
    pub timestamp: RawScalar,
    pub message: String,
    #[serde(default)]
    pub keyword: String,
    pub amount: RawScalar,
}

/// Canonical transaction record held in the mirror.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TransactionRecord {
    pub address_from: String,
    pub address_to: String,
    /// Display form of the on-chain timestamp
    pub timestamp: String,
    pub timestamp_secs: u64,
    pub message: String,
    pub keyword: String,
    /// On-chain amount scaled down by 10^18
    pub amount: f64,
}

impl RawRecord {
    pub fn normalize(&self) -> Result<TransactionRecord, SessionError> {
        let timestamp_secs = self.timestamp.normalize("timestamp")?;
        let timestamp_secs =
            u64::try_from(timestamp_secs).map_err(|_| SessionError::Unparseable {
                field: "timestamp",
                raw: timestamp_secs.to_string(),
            })?;
        let timestamp = format_timestamp(timestamp_secs).ok_or(SessionError::Unparseable {
            field: "timestamp",
            raw: timestamp_secs.to_string(),
        })?;

        let amount_wei = self.amount.normalize("amount")?;

        Ok(TransactionRecord {
            address_from: self.sender.clone(),
            address_to: self.receiver.clone(),
            timestamp,
            timestamp_secs,
            message: self.message.clone(),
            keyword: self.keyword.clone(),
            amount: wei_to_ether(amount_wei),
        })
    }
}

/// Render on-chain seconds as a human-readable UTC string.
pub fn format_timestamp(secs: u64) -> Option<String> {
    let dt = DateTime::from_timestamp(i64::try_from(secs).ok()?, 0)?;
    Some(dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
}

/// Convert a wei amount to its display value.
pub fn wei_to_ether(wei: u128) -> f64 {
    wei as f64 / WEI_PER_ETHER as f64
}

/// Parse a user-entered decimal amount into wei, exactly.
///
/// Accepts up to 18 fractional digits; rejects anything non-numeric, zero, or
/// negative before a single network call is made.
pub fn parse_ether(amount: &str) -> Result<u128, String> {
    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Err("amount is empty".to_string());
    }

    let (int_part, frac_part) = match trimmed.split_once('.') {
        Some((i, f)) => (i, f),
        None => (trimmed, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(format!("'{}' is not a number", amount));
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit())
        || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(format!("'{}' is not a number", amount));
    }
    if frac_part.len() > 18 {
        return Err(format!(
            "'{}' has more than 18 decimal places",
            amount
        ));
    }

    let int_value: u128 = if int_part.is_empty() {
        0
    } else {
        int_part
            .parse()
            .map_err(|_| format!("'{}' is too large", amount))?
    };

    let mut frac_value: u128 = 0;
    if !frac_part.is_empty() {
        frac_value = frac_part
            .parse::<u128>()
            .map_err(|_| format!("'{}' is not a number", amount))?;
        frac_value *= 10u128.pow((18 - frac_part.len()) as u32);
    }

    let wei = int_value
        .checked_mul(WEI_PER_ETHER)
        .and_then(|v| v.checked_add(frac_value))
        .ok_or_else(|| format!("'{}' is too large", amount))?;

    if wei == 0 {
        return Err("amount must be greater than zero".to_string());
    }

    Ok(wei)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ether_exact_fraction() {
        assert_eq!(parse_ether("0.001").unwrap(), 1_000_000_000_000_000);
        assert_eq!(parse_ether("1").unwrap(), WEI_PER_ETHER);
        assert_eq!(parse_ether("1.5").unwrap(), WEI_PER_ETHER + WEI_PER_ETHER / 2);
    }

    #[test]
    fn test_parse_ether_rejects_bad_input() {
        assert!(parse_ether("0").is_err());
        assert!(parse_ether("0.0").is_err());
        assert!(parse_ether("abc").is_err());
        assert!(parse_ether("-1").is_err());
        assert!(parse_ether("").is_err());
        assert!(parse_ether(".").is_err());
        assert!(parse_ether("1.0000000000000000001").is_err());
    }

    #[test]
    fn test_round_trip_small_amount() {
        let wei = parse_ether("0.001").unwrap();
        assert_eq!(wei_to_ether(wei), 0.001);
    }

    #[test]
    fn test_scalar_shapes_normalize_alike() {
        let number = RawScalar::Number(1_000);
        let decimal = RawScalar::Text("1000".to_string());
        let hex = RawScalar::Text("0x3e8".to_string());
        let hex_object = RawScalar::HexObject {
            hex: "0x3e8".to_string(),
        };

        for scalar in [number, decimal, hex, hex_object] {
            assert_eq!(scalar.normalize("amount").unwrap(), 1_000);
        }
    }

    #[test]
    fn test_unknown_scalar_shape_is_typed_error() {
        let garbage = RawScalar::Text("not-a-number".to_string());
        match garbage.normalize("amount") {
            Err(SessionError::Unparseable { field, raw }) => {
                assert_eq!(field, "amount");
                assert_eq!(raw, "not-a-number");
            }
            other => panic!("expected Unparseable, got {:?}", other),
        }
    }

    #[test]
    fn test_raw_record_normalizes() {
        let raw: RawRecord = serde_json::from_str(
            r#"{
                "sender": "0xabc",
                "receiver": "0xdef",
                "timestamp": 1700000000,
                "message": "gm",
                "keyword": "wave",
                "amount": {"_hex": "0x38d7ea4c68000"}
            }"#,
        )
        .unwrap();

        let record = raw.normalize().unwrap();
        assert_eq!(record.address_from, "0xabc");
        assert_eq!(record.address_to, "0xdef");
        assert_eq!(record.amount, 0.001);
        assert_eq!(record.timestamp_secs, 1_700_000_000);
        assert!(record.timestamp.ends_with("UTC"));
    }

    #[test]
    fn test_timestamp_display_is_stable() {
        assert_eq!(
            format_timestamp(0).unwrap(),
            "1970-01-01 00:00:00 UTC"
        );
    }
}
