//! Strip model reasoning from miner answers

use once_cell::sync::Lazy;
use regex::Regex;

static REASONING_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<think>.*?</think>|<reasoning>.*?</reasoning>|<analysis>.*?</analysis>")
        .expect("Invalid reasoning block regex")
});

static MARKER_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?is)\[\[\s*reasoning\s*\]\].*?\[\[\s*/\s*reasoning\s*\]\]|\[\[\s*thinking\s*\]\].*?\[\[\s*/\s*thinking\s*\]\]|\[\[\s*thought\s*\]\].*?\[\[\s*/\s*thought\s*\]\]|\[\[\s*analysis\s*\]\].*?\[\[\s*/\s*analysis\s*\]\]",
    )
    .expect("Invalid marker block regex")
});

// Runs after closed blocks are gone, so any opener left is unterminated
static UNTERMINATED_OPENER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(think|reasoning|analysis)>.*$|\[\[\s*(reasoning|thinking|thought|analysis)\s*\]\].*$")
        .expect("Invalid opener regex")
});

static REASONING_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\[\[\s*/?\s*(reasoning|thinking|thought|analysis)\s*\]\]").expect("Invalid marker regex")
});

static REASONING_PREAMBLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)^\s*(reasoning|chain of thought)\s*:.*final answer\s*:").expect("Invalid preamble regex")
});

/// Remove reasoning blocks, markers, and preambles from an answer
///
/// # Examples
///
/// ```
/// use verity_oracle::sanitize_answer;
///
/// assert_eq!(sanitize_answer("<think>check the date</think> Yes, it opened."), "Yes, it opened.");
/// assert_eq!(
///     sanitize_answer("Reasoning: prices rose.\nFinal answer: $105k"),
///     "$105k"
/// );
/// ```
pub fn sanitize_answer(text: &str) -> String {
    let without_tags = REASONING_BLOCK.replace_all(text, "");
    let without_blocks = MARKER_BLOCK.replace_all(&without_tags, "");
    let without_opener = UNTERMINATED_OPENER.replace(&without_blocks, "");
    let without_markers = REASONING_MARKER.replace_all(&without_opener, "");
    let without_preamble = REASONING_PREAMBLE.replace(&without_markers, "");
    without_preamble.trim().to_string()
}
