//! Free-text cleanup applied to content before it is processed or relayed.
//!
//! The pipeline runs in a fixed order:
//! 1. unwrap a message that is entirely one `[display](target)` link, unless
//!    the display text is a command
//! 2. strip `@mentions`
//! 3. strip `<tag>`-like markup
//! 4. strip every configured phrase, case-insensitively and literally
//! 5. collapse whitespace runs

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use tracing::warn;

#[allow(clippy::expect_used)]
static FULL_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[([^\]]+)\]\(([^)]+)\)$").expect("link pattern is valid")
});

#[allow(clippy::expect_used)]
static MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)@\w+").expect("mention pattern is valid"));

#[allow(clippy::expect_used)]
static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

#[allow(clippy::expect_used)]
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Cleans `text` using the given phrase list. Never fails; empty input
/// yields empty output.
#[must_use]
pub fn clean_text(text: &str, phrases: &[String]) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut cleaned = unwrap_link(text.trim()).to_owned();

    cleaned = MENTION.replace_all(&cleaned, "").trim().to_owned();
    cleaned = MARKUP_TAG.replace_all(&cleaned, "").trim().to_owned();

    for phrase in phrases.iter().filter(|p| !p.is_empty()) {
        match phrase_pattern(phrase) {
            Ok(pattern) => cleaned = pattern.replace_all(&cleaned, "").trim().to_owned(),
            Err(e) => warn!("Skipping cleanup phrase {:?}: {}", phrase, e),
        }
    }

    WHITESPACE.replace_all(&cleaned, " ").trim().to_owned()
}

/// Returns the display text of a whole-message link, or the input unchanged.
/// Links whose display text is a command are left intact.
fn unwrap_link(text: &str) -> &str {
    match FULL_LINK.captures(text).and_then(|caps| caps.get(1)) {
        Some(display) if !display.as_str().starts_with('/') => display.as_str(),
        _ => text,
    }
}

/// Literal, case-insensitive matcher for a configured phrase.
fn phrase_pattern(phrase: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&regex::escape(phrase))
        .case_insensitive(true)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phrases(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(clean_text("", &phrases(&["x"])), "");
    }

    #[test]
    fn test_link_is_unwrapped() {
        assert_eq!(clean_text("[Check this](https://x.y/z)", &[]), "Check this");
    }

    #[test]
    fn test_linked_command_is_protected() {
        let input = "[/run_task hello](https://x.y/z)";
        assert_eq!(clean_text(input, &[]), input);
    }

    #[test]
    fn test_partial_link_is_not_unwrapped() {
        assert_eq!(
            clean_text("see [docs](https://x.y) now", &[]),
            "see [docs](https://x.y) now"
        );
    }

    #[test]
    fn test_mention_inside_link_display_is_stripped() {
        assert_eq!(clean_text("[Hi @someone](https://x.y)", &[]), "Hi");
    }

    #[test]
    fn test_mentions_and_tags_stripped() {
        assert_eq!(
            clean_text("Awesome picture to process @source_user_handle", &[]),
            "Awesome picture to process"
        );
        assert_eq!(clean_text("<b>bold</b> text", &[]), "bold text");
    }

    #[test]
    fn test_configured_phrase_stripped() {
        assert_eq!(
            clean_text(
                "Hello Shared via Telegram world",
                &phrases(&["Shared via Telegram"])
            ),
            "Hello world"
        );
    }

    #[test]
    fn test_phrase_match_is_case_insensitive_and_literal() {
        assert_eq!(clean_text("a (B) c", &phrases(&["(b)"])), "a c");
        assert_eq!(clean_text("a.b axb", &phrases(&["a.b"])), "axb");
    }

    #[test]
    fn test_phrase_can_match_inside_word() {
        assert_eq!(clean_text("category cat", &phrases(&["cat"])), "egory");
    }

    #[test]
    fn test_phrases_applied_in_order() {
        assert_eq!(clean_text("abcd", &phrases(&["bc", "ad"])), "");
        assert_eq!(clean_text("abcd", &phrases(&["ad", "bc"])), "ad");
    }

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(clean_text("  one \n\n two\tthree  ", &[]), "one two three");
    }

    #[test]
    fn test_second_pass_changes_nothing() {
        let list = phrases(&["Shared via Telegram", "Please remove this."]);
        let inputs = [
            "This item has Shared via Telegram and @test_bot_name. Please remove this.",
            "[Check this](https://x.y/z)",
            "<i>hello</i>   @a @b world",
            "[/run_task Process this link](https://test.com)",
        ];
        for input in inputs {
            let once = clean_text(input, &list);
            assert_eq!(clean_text(&once, &list), once, "input: {input}");
        }
    }
}
