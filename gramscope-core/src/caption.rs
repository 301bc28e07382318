use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static HASHTAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([\p{L}\p{N}_]+)").expect("hashtag pattern is valid"));

// an `@` inside a word (e-mail addresses) is not a mention
static MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\p{L}\p{N}_.])@([\p{L}\p{N}_.]+)").expect("mention pattern is valid")
});

/// Hashtags and mentions found in one caption, without the `#`/`@` sigils.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionExtraction {
    pub hashtags: Vec<String>,
    pub mentions: Vec<String>,
}

pub fn parse_caption(caption: &str) -> CaptionExtraction {
    if caption.is_empty() {
        return CaptionExtraction::default();
    }

    CaptionExtraction {
        hashtags: unique_captures(&HASHTAG, caption, |tag| tag),
        // usernames cannot end with a dot, so "@alice." ends a sentence
        mentions: unique_captures(&MENTION, caption, |name| name.trim_end_matches('.')),
    }
}

fn unique_captures(pattern: &Regex, text: &str, clean: fn(&str) -> &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for captures in pattern.captures_iter(text) {
        let value = clean(&captures[1]);
        if !value.is_empty() && !found.iter().any(|f| f == value) {
            found.push(value.to_string());
        }
    }
    found
}
