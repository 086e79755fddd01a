//! Keyword classification of incoming queries

use once_cell::sync::Lazy;
use regex::Regex;

static TIME_SENSITIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(latest|today|recent|recently|current|currently|right now|tonight|this week|yesterday|live|breaking)\b",
    )
    .expect("Invalid time-sensitive regex")
});

static SPORTS_OR_EVENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(score|match|game|won|win|beat|vs|final|tournament|league|championship|cup|race|election result|fixture)\b",
    )
    .expect("Invalid sports regex")
});

static CLAIM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(is it true|true or false|fact check|fact-check|hoax|is this real|really|claim|rumor|rumour|debunk|fake)\b|\bdid\b.+\bsay\b",
    )
    .expect("Invalid claim regex")
});

/// Whether the query asks about something that changes over time
pub fn is_time_sensitive(query: &str) -> bool {
    TIME_SENSITIVE.is_match(query)
}

/// Whether the query is about a sports fixture or live event outcome
pub fn is_sports_or_event(query: &str) -> bool {
    SPORTS_OR_EVENT.is_match(query)
}

/// Whether the query asks to verify a claim
///
/// # Examples
///
/// ```
/// use verity_consensus::query::is_claim_query;
///
/// assert!(is_claim_query("Is it true that the Eiffel Tower is being sold?"));
/// assert!(is_claim_query("Did the minister say taxes will double?"));
/// assert!(!is_claim_query("What is the price of bitcoin?"));
/// ```
pub fn is_claim_query(query: &str) -> bool {
    CLAIM.is_match(query)
}
