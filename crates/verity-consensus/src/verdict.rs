//! Yes/no inference for claim-checking answers
//!
//! Verdict and label are computed in two explicit steps:
//!
//! 1. [`tally`] the per-response stances and [`VerdictTally::decide`] a side,
//!    giving the round [`Verdict`]
//! 2. [`derive_label`] from that verdict and the agreement ratio, where an
//!    explicit verdict always takes precedence over the ratio

use once_cell::sync::Lazy;
use regex::Regex;
use verity_domain::{Label, Verdict};

static STRONG_NEGATIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(not true|false|hoax|cannot|isn't true|is not|did not|didn't|no evidence|debunked|fake|incorrect|untrue|misleading)\b|(^|[^a-z0-9])no([,.!]|$)|^no\s",
    )
    .expect("Invalid negative phrase regex")
});

static NEGATION_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(not|no|never|false|hoax|neither|nor)\b|n't\b").expect("Invalid negation regex")
});

static STRONG_POSITIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(yes|true|confirmed|correct|accurate|indeed|verified)\b")
        .expect("Invalid positive phrase regex")
});

/// Stance of a single answer: `Some(true)` affirms, `Some(false)` denies
///
/// The negative check runs first, so "not true" is a denial.
///
/// # Examples
///
/// ```
/// use verity_consensus::verdict::infer_response_verdict;
///
/// assert_eq!(infer_response_verdict("Yes, that is confirmed."), Some(true));
/// assert_eq!(infer_response_verdict("No, this claim is false."), Some(false));
/// assert_eq!(infer_response_verdict("It's complicated."), None);
/// ```
pub fn infer_response_verdict(text: &str) -> Option<bool> {
    let lowered = text.trim().to_lowercase().replace('\u{2019}', "'");

    if STRONG_NEGATIVE.is_match(&lowered) {
        return Some(false);
    }
    if !NEGATION_MARKER.is_match(&lowered) && STRONG_POSITIVE.is_match(&lowered) {
        return Some(true);
    }
    None
}

/// Per-side positions and weights for a round
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerdictTally {
    /// Positions of affirming responses
    pub yes: Vec<usize>,
    /// Positions of denying responses
    pub no: Vec<usize>,
    /// Summed weight of affirming responses
    pub yes_weight: f64,
    /// Summed weight of denying responses
    pub no_weight: f64,
    /// Summed weight of every response in the round
    pub total_weight: f64,
    /// Number of responses tallied
    pub responded: usize,
}

impl VerdictTally {
    /// Pick the winning side, if any
    ///
    /// A side qualifies when it has at least `threshold` members and holds at
    /// least half the round's weight. Equal-weight qualifying sides cancel.
    pub fn decide(&self, threshold: usize) -> Option<bool> {
        let yes_ok = self.yes.len() >= threshold && self.share(self.yes_weight, self.yes.len()) >= 0.5;
        let no_ok = self.no.len() >= threshold && self.share(self.no_weight, self.no.len()) >= 0.5;

        match (yes_ok, no_ok) {
            (true, true) => {
                if self.yes_weight > self.no_weight {
                    Some(true)
                } else if self.no_weight > self.yes_weight {
                    Some(false)
                } else {
                    None
                }
            }
            (true, false) => Some(true),
            (false, true) => Some(false),
            (false, false) => None,
        }
    }

    /// Round verdict for a threshold
    pub fn verdict(&self, threshold: usize) -> Verdict {
        Verdict::from_decision(self.decide(threshold))
    }

    /// Members of a side
    pub fn side(&self, affirm: bool) -> &[usize] {
        if affirm {
            &self.yes
        } else {
            &self.no
        }
    }

    /// Share of total weight; falls back to head-count when the round is weightless
    fn share(&self, weight: f64, count: usize) -> f64 {
        if self.total_weight > 0.0 {
            weight / self.total_weight
        } else {
            let responded = self.responded.max(1);
            count as f64 / responded as f64
        }
    }
}

/// Tally stances across a round
///
/// `texts` and `weights` are parallel, indexed by response position.
pub fn tally(texts: &[&str], weights: &[f64]) -> VerdictTally {
    let mut result = VerdictTally {
        responded: texts.len(),
        ..VerdictTally::default()
    };

    for (position, text) in texts.iter().enumerate() {
        let weight = weights.get(position).copied().unwrap_or(0.0);
        result.total_weight += weight;
        match infer_response_verdict(text) {
            Some(true) => {
                result.yes.push(position);
                result.yes_weight += weight;
            }
            Some(false) => {
                result.no.push(position);
                result.no_weight += weight;
            }
            None => {}
        }
    }
    result
}

/// Agreement label for a round
///
/// An explicit verdict wins; otherwise the agreement ratio decides.
pub fn derive_label(verdict: Verdict, agreement_ratio: f64) -> Label {
    match verdict {
        Verdict::True => Label::Positive,
        Verdict::False => Label::Negative,
        Verdict::Uncertain if agreement_ratio >= 0.66 => Label::Positive,
        Verdict::Uncertain if agreement_ratio < 0.34 => Label::Negative,
        Verdict::Uncertain => Label::Disputed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_phrases() {
        assert_eq!(infer_response_verdict("That is not true."), Some(false));
        assert_eq!(infer_response_verdict("The moon landing hoax claim is debunked"), Some(false));
        assert_eq!(infer_response_verdict("No. He never said that."), Some(false));
        assert_eq!(infer_response_verdict("no it didn't happen"), Some(false));
        assert_eq!(infer_response_verdict("He didn\u{2019}t win."), Some(false));
    }

    #[test]
    fn test_negative_wins_over_positive() {
        assert_eq!(infer_response_verdict("Yes, it is true that the rumor is false"), Some(false));
    }

    #[test]
    fn test_positive_phrases() {
        assert_eq!(infer_response_verdict("Yes, Bitcoin will hit $130,000"), Some(true));
        assert_eq!(infer_response_verdict("Confirmed by officials."), Some(true));
    }

    #[test]
    fn test_negation_blocks_positive() {
        assert_eq!(infer_response_verdict("I'm not sure it is correct"), None);
        assert_eq!(infer_response_verdict("Never been verified"), None);
    }

    #[test]
    fn test_no_inside_words_is_ignored() {
        assert_eq!(infer_response_verdict("Nobody knows. Yes, probably."), Some(true));
        assert_eq!(infer_response_verdict("Noted, verified."), Some(true));
    }

    #[test]
    fn test_bare_no_is_denial() {
        assert_eq!(infer_response_verdict("No"), Some(false));
        assert_eq!(infer_response_verdict("  no  "), Some(false));
        assert_eq!(infer_response_verdict("No!"), Some(false));
        assert_eq!(infer_response_verdict("Yes"), Some(true));
    }

    #[test]
    fn test_bare_no_round_decides_false() {
        let texts = ["Yes", "No", "No", "No"];
        let t = tally(&texts, &[1.0; 4]);
        assert_eq!(t.no, vec![1, 2, 3]);
        assert_eq!(t.verdict(2), Verdict::False);
    }

    #[test]
    fn test_neutral() {
        assert_eq!(infer_response_verdict("The price is $100,000"), None);
        assert_eq!(infer_response_verdict(""), None);
    }

    #[test]
    fn test_decide_majority_no() {
        let texts = ["No.", "No, false.", "No, that is a hoax.", "Yes", "Yes indeed"];
        let t = tally(&texts, &[1.0; 5]);
        assert_eq!(t.no, vec![0, 1, 2]);
        assert_eq!(t.yes, vec![3, 4]);
        assert_eq!(t.decide(3), Some(false));
        assert_eq!(t.verdict(3), Verdict::False);
    }

    #[test]
    fn test_decide_requires_threshold() {
        let texts = ["Yes", "Yes", "maybe", "unclear"];
        let t = tally(&texts, &[1.0; 4]);
        assert_eq!(t.decide(3), None);
        assert_eq!(t.decide(2), Some(true));
    }

    #[test]
    fn test_decide_requires_weight_share() {
        let texts = ["Yes", "Yes", "No", "unclear"];
        let t = tally(&texts, &[0.2, 0.2, 3.0, 3.0]);
        assert_eq!(t.decide(2), None);
    }

    #[test]
    fn test_decide_equal_weight_tie() {
        let texts = ["Yes", "Yes", "No", "No"];
        let t = tally(&texts, &[1.0; 4]);
        assert_eq!(t.decide(2), None);
    }

    #[test]
    fn test_decide_zero_weight_uses_counts() {
        let texts = ["Yes", "Yes", "Yes", "hmm"];
        let t = tally(&texts, &[0.0; 4]);
        assert_eq!(t.decide(2), Some(true));
    }

    #[test]
    fn test_derive_label_precedence() {
        assert_eq!(derive_label(Verdict::True, 0.1), Label::Positive);
        assert_eq!(derive_label(Verdict::False, 0.9), Label::Negative);
        assert_eq!(derive_label(Verdict::Uncertain, 0.66), Label::Positive);
        assert_eq!(derive_label(Verdict::Uncertain, 0.5), Label::Disputed);
        assert_eq!(derive_label(Verdict::Uncertain, 0.34), Label::Disputed);
        assert_eq!(derive_label(Verdict::Uncertain, 0.2), Label::Negative);
    }
}
