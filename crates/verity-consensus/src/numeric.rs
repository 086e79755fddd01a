//! Currency/quantity range extraction from free text
//!
//! Miners quote prices in many shapes: `$100,000–$110,000`, `100k to 110k`,
//! `$105k`, `105000 USD`. This module turns the first plausible one into a
//! [`NumericRange`]. A response without one is simply non-numeric.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use verity_domain::NumericRange;

/// Half-width used to widen a single quoted value into a range
pub const SINGLE_VALUE_SPREAD: f64 = 2500.0;

const NUMBER: &str = r"\d[\d,]*(?:\.\d+)?";

static RANGE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)(?P<c1>\$)?\s*(?P<n1>{NUMBER})\s*(?P<k1>k\b)?\s*(?:-|–|—|\bto\b)\s*(?P<c2>\$)?\s*(?P<n2>{NUMBER})\s*(?P<k2>k\b)?"
    ))
    .expect("Invalid range regex")
});

static STATED_RANGE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)(?P<c1>\$)?\s*(?P<n1>{NUMBER})\s*(?P<k1>k\b)?\s*(?:-|–|—|\bto\b|\band\b)\s*(?P<c2>\$)?\s*(?P<n2>{NUMBER})\s*(?P<k2>k\b)?"
    ))
    .expect("Invalid stated range regex")
});

static SINGLE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\$\s*(?P<dollar>{NUMBER})\s*(?P<dollar_k>k\b)?|(?P<kilo>{NUMBER})\s*k\b|(?P<suffix_usd>{NUMBER})\s*usd\b|\busd\s*(?P<prefix_usd>{NUMBER})\s*(?P<prefix_k>k\b)?"
    ))
    .expect("Invalid single value regex")
});

/// Extract a plausible numeric range from free text
///
/// Two-sided ranges are tried first, then single currency-marked values
/// widened by [`SINGLE_VALUE_SPREAD`]. Returns `None` when nothing passes the
/// plausibility floor.
///
/// # Examples
///
/// ```
/// use verity_consensus::numeric::parse_range;
///
/// let range = parse_range("Somewhere around $100,000–$110,000 by year end").unwrap();
/// assert_eq!((range.low, range.high), (100_000.0, 110_000.0));
///
/// let single = parse_range("I expect $105k").unwrap();
/// assert_eq!((single.low, single.high), (102_500.0, 107_500.0));
///
/// assert!(parse_range("Up $300 today").is_none());
/// ```
pub fn parse_range(text: &str) -> Option<NumericRange> {
    let mentions_usd = text.to_lowercase().contains("usd");

    let two_sided = RANGE_PATTERN
        .captures_iter(text)
        .find_map(|caps| range_from_captures(&caps, mentions_usd));
    if two_sided.is_some() {
        return two_sided;
    }

    SINGLE_PATTERN
        .captures_iter(text)
        .find_map(|caps| single_from_captures(&caps))
}

/// Whether the text states a currency range (`$X-$Y`, `$X to $Y`, `between $X and $Y`)
pub fn contains_numeric_range(text: &str) -> bool {
    let mentions_usd = text.to_lowercase().contains("usd");
    STATED_RANGE_PATTERN
        .captures_iter(text)
        .any(|caps| range_from_captures(&caps, mentions_usd).is_some())
}

fn range_from_captures(caps: &Captures<'_>, mentions_usd: bool) -> Option<NumericRange> {
    let has_currency = caps.name("c1").is_some() || caps.name("c2").is_some();
    let low_k = caps.name("k1").is_some();
    let high_k = caps.name("k2").is_some();
    if !(has_currency || low_k || high_k || mentions_usd) {
        return None;
    }

    let mut low = parse_number(caps.name("n1")?.as_str())?;
    let mut high = parse_number(caps.name("n2")?.as_str())?;

    // A suffix on one side carries over to a bare short number on the other
    if low_k {
        low *= 1000.0;
    } else if high_k && low < 1000.0 {
        low *= 1000.0;
    }
    if high_k {
        high *= 1000.0;
    } else if low_k && high < 1000.0 {
        high *= 1000.0;
    }

    if low > high {
        std::mem::swap(&mut low, &mut high);
    }
    if low == high {
        return widen(low);
    }
    NumericRange::new(low, high)
}

fn single_from_captures(caps: &Captures<'_>) -> Option<NumericRange> {
    let value = if let Some(m) = caps.name("dollar") {
        scale(parse_number(m.as_str())?, caps.name("dollar_k").is_some())
    } else if let Some(m) = caps.name("kilo") {
        scale(parse_number(m.as_str())?, true)
    } else if let Some(m) = caps.name("suffix_usd") {
        parse_number(m.as_str())?
    } else if let Some(m) = caps.name("prefix_usd") {
        scale(parse_number(m.as_str())?, caps.name("prefix_k").is_some())
    } else {
        return None;
    };
    widen(value)
}

fn scale(value: f64, thousands: bool) -> f64 {
    if thousands {
        value * 1000.0
    } else {
        value
    }
}

fn widen(value: f64) -> Option<NumericRange> {
    NumericRange::new(value - SINGLE_VALUE_SPREAD, value + SINGLE_VALUE_SPREAD)
}

fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(text: &str) -> Option<(f64, f64)> {
        parse_range(text).map(|r| (r.low, r.high))
    }

    #[test]
    fn test_dollar_range_with_en_dash() {
        assert_eq!(bounds("$100,000–$110,000"), Some((100_000.0, 110_000.0)));
    }

    #[test]
    fn test_range_with_to() {
        assert_eq!(bounds("between $95,000 to $99,500"), Some((95_000.0, 99_500.0)));
    }

    #[test]
    fn test_k_suffix_range() {
        assert_eq!(bounds("likely 100k-120k"), Some((100_000.0, 120_000.0)));
    }

    #[test]
    fn test_k_suffix_carries_over() {
        assert_eq!(bounds("$100-110k"), Some((100_000.0, 110_000.0)));
    }

    #[test]
    fn test_usd_context_enables_bare_range() {
        assert_eq!(bounds("95000 - 105000 USD"), Some((95_000.0, 105_000.0)));
        assert_eq!(bounds("95000 - 105000"), None);
    }

    #[test]
    fn test_reversed_range_is_swapped() {
        assert_eq!(bounds("$120,000 - $110,000"), Some((110_000.0, 120_000.0)));
    }

    #[test]
    fn test_single_dollar_value() {
        assert_eq!(bounds("Yes, Bitcoin will hit $130,000"), Some((127_500.0, 132_500.0)));
    }

    #[test]
    fn test_single_k_value() {
        assert_eq!(bounds("$105k"), Some((102_500.0, 107_500.0)));
        assert_eq!(bounds("around 98.5k"), Some((96_000.0, 101_000.0)));
    }

    #[test]
    fn test_single_usd_value() {
        assert_eq!(bounds("roughly 64000 USD"), Some((61_500.0, 66_500.0)));
        assert_eq!(bounds("USD 64,000"), Some((61_500.0, 66_500.0)));
    }

    #[test]
    fn test_rejects_implausible_values() {
        assert_eq!(bounds("$300 today"), None);
        assert_eq!(bounds("up 12% since 2021-2022"), None);
        assert_eq!(bounds("see page 45"), None);
    }

    #[test]
    fn test_plain_text_is_non_numeric() {
        assert_eq!(bounds("Yes, that is correct."), None);
        assert_eq!(bounds(""), None);
    }

    #[test]
    fn test_first_plausible_candidate_wins() {
        // The percentage range is implausible; the dollar range after it wins
        assert_eq!(
            bounds("A 5-10% rise puts it at $60,000 to $65,000"),
            Some((60_000.0, 65_000.0))
        );
    }

    #[test]
    fn test_contains_numeric_range() {
        assert!(contains_numeric_range("between $130,000 and $135,000"));
        assert!(contains_numeric_range("$100k-$110k"));
        assert!(!contains_numeric_range("about $130,000"));
        assert!(!contains_numeric_range("between 2 and 3 people"));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use verity_domain::PLAUSIBILITY_FLOOR;

    proptest! {
        /// Property: any accepted range is plausible
        #[test]
        fn test_accepted_ranges_are_plausible(
            a in 0u32..500_000,
            b in 0u32..500_000,
            sep in prop::sample::select(vec!["-", " to ", "–", "—"]),
            suffix in prop::sample::select(vec!["", "k", " USD"]),
        ) {
            let text = format!("${}{}{}", a, sep, b) + suffix;
            if let Some(range) = parse_range(&text) {
                prop_assert!(range.low >= PLAUSIBILITY_FLOOR);
                prop_assert!(range.high > range.low);
            }
        }

        /// Property: parsing never panics on arbitrary text
        #[test]
        fn test_parse_total(s in "\\PC{0,60}") {
            let _ = parse_range(&s);
        }
    }
}
