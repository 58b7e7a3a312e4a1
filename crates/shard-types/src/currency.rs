//! Currency formatting and parsing.
//!
//! Currency is denominated in integer copper everywhere internally
//! (`1 gold = 100 silver = 10,000 copper`); these are the only functions
//! that convert to and from the human-facing `"Xg Ys Zc"` display format
//! (§6 currency units).

use thiserror::Error;

/// Copper per silver.
const COPPER_PER_SILVER: u64 = 100;
/// Copper per gold.
const COPPER_PER_GOLD: u64 = 10_000;

/// An error parsing a formatted gold string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CurrencyParseError {
    /// The string contained a token that wasn't a valid `"<number><g|s|c>"` part.
    #[error("invalid currency token: {0}")]
    InvalidToken(String),
    /// A numeric part did not fit in a `u64`.
    #[error("currency amount out of range: {0}")]
    OutOfRange(String),
}

/// Decompose a copper amount into `(gold, silver, copper)` metal parts.
#[must_use]
pub const fn format_gold_to_metals(copper: u64) -> (u64, u8, u8) {
    let gold = copper / COPPER_PER_GOLD;
    let remainder = copper % COPPER_PER_GOLD;
    let silver = remainder / COPPER_PER_SILVER;
    let copper_remainder = remainder % COPPER_PER_SILVER;
    #[allow(clippy::cast_possible_truncation)]
    (gold, silver as u8, copper_remainder as u8)
}

/// Recompose `(gold, silver, copper)` metal parts into a total copper amount.
#[must_use]
pub const fn parse_metals_to_gold(gold: u64, silver: u8, copper: u8) -> u64 {
    gold * COPPER_PER_GOLD + (silver as u64) * COPPER_PER_SILVER + copper as u64
}

/// Format a copper amount as a space-joined string of nonzero metal parts,
/// e.g. `"10g 5s 25c"`. An amount of zero formats as `"0c"`.
#[must_use]
pub fn format_gold_string(copper: u64) -> String {
    let (gold, silver, copper_remainder) = format_gold_to_metals(copper);
    let mut parts = Vec::with_capacity(3);
    if gold > 0 {
        parts.push(format!("{gold}g"));
    }
    if silver > 0 {
        parts.push(format!("{silver}s"));
    }
    if copper_remainder > 0 || parts.is_empty() {
        parts.push(format!("{copper_remainder}c"));
    }
    parts.join(" ")
}

/// Parse a space-joined metal string (e.g. `"10g 25c"`) into a total copper
/// amount. Any subset of `g`/`s`/`c` tokens may be present, in any order.
pub fn parse_gold_string(input: &str) -> Result<u64, CurrencyParseError> {
    let mut gold: u64 = 0;
    let mut silver: u8 = 0;
    let mut copper: u8 = 0;

    for token in input.split_whitespace() {
        let Some(suffix) = token.chars().last() else {
            return Err(CurrencyParseError::InvalidToken(token.to_string()));
        };
        let digits = &token[..token.len() - suffix.len_utf8()];
        match suffix {
            'g' => {
                gold = digits
                    .parse()
                    .map_err(|_err| CurrencyParseError::InvalidToken(token.to_string()))?;
            }
            's' => {
                silver = digits
                    .parse()
                    .map_err(|_err| CurrencyParseError::OutOfRange(token.to_string()))?;
            }
            'c' => {
                copper = digits
                    .parse()
                    .map_err(|_err| CurrencyParseError::OutOfRange(token.to_string()))?;
            }
            _ => return Err(CurrencyParseError::InvalidToken(token.to_string())),
        }
    }

    Ok(parse_metals_to_gold(gold, silver, copper))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_currency_formatting() {
        assert_eq!(format_gold_string(100_525), "10g 5s 25c");
        assert_eq!(format_gold_string(25), "25c");
        assert_eq!(format_gold_string(0), "0c");
        assert_eq!(parse_gold_string("10g 25c").ok(), Some(100_025));
    }

    #[test]
    fn metals_roundtrip() {
        for copper in [0_u64, 1, 99, 100, 9_999, 10_000, 100_525, 123_456_789] {
            let (g, s, c) = format_gold_to_metals(copper);
            assert_eq!(parse_metals_to_gold(g, s, c), copper);
        }
    }

    #[test]
    fn format_parse_roundtrip() {
        for copper in [0_u64, 25, 100, 5_000, 100_525, 999_999] {
            let formatted = format_gold_string(copper);
            assert_eq!(parse_gold_string(&formatted).ok(), Some(copper));
        }
    }

    #[test]
    fn invalid_token_is_rejected() {
        assert!(parse_gold_string("10x").is_err());
        assert!(parse_gold_string("abcg").is_err());
    }
}
