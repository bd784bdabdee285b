//! Splits long outbound text into numbered, length-safe parts.

/// Characters that make a natural break point.
const BREAK_CHARS: [char; 4] = ['\n', '.', '!', '?'];

/// Splits `text` into chunks of at most `max_len` characters.
///
/// Text that already fits is returned as a single untagged chunk. Longer text
/// is cut at the last break character that keeps the chunk at or above 80%
/// of `max_len`, or hard-cut at `max_len` when there is none; the break
/// character stays with the preceding chunk. When more than one chunk is
/// produced, each one gets a `--- (Part i of N) ---` tag unless the tag would
/// push it past `max_len`, in which case that chunk goes out untagged.
#[must_use]
pub fn split_message(text: &str, max_len: usize) -> Vec<String> {
    let max_len = max_len.max(1);
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_len {
        return vec![text.to_owned()];
    }

    let min_break = max_len * 4 / 5;
    let mut pieces: Vec<String> = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let mut end = (start + max_len).min(chars.len());

        if end < chars.len()
            && let Some(pos) = (start + min_break..end)
                .rev()
                .find(|&i| BREAK_CHARS.contains(&chars[i]))
        {
            end = pos + 1;
        }

        pieces.push(chars[start..end].iter().collect());
        start = end;
    }

    let total = pieces.len();
    if total == 1 {
        return pieces;
    }

    pieces
        .into_iter()
        .enumerate()
        .map(|(i, piece)| {
            let tag = part_tag(i + 1, total);
            if piece.chars().count() + tag.chars().count() <= max_len {
                piece + &tag
            } else {
                piece
            }
        })
        .collect()
}

/// Numbering suffix appended to a chunk.
#[must_use]
pub fn part_tag(part: usize, total: usize) -> String {
    format!("\n\n--- (Part {part} of {total}) ---")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_tags(chunks: &[String]) -> String {
        let total = chunks.len();
        chunks
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let tag = part_tag(i + 1, total);
                c.strip_suffix(tag.as_str()).unwrap_or(c).to_owned()
            })
            .collect()
    }

    #[test]
    fn test_short_text_is_single_untagged_chunk() {
        assert_eq!(split_message("hello", 100), vec!["hello".to_owned()]);
        assert_eq!(split_message("", 100), vec![String::new()]);
    }

    #[test]
    fn test_text_of_exactly_max_len_is_untagged() {
        let text = "a".repeat(4000);
        let chunks = split_message(&text, 4000);
        assert_eq!(chunks, vec![text]);
    }

    #[test]
    fn test_hard_cut_without_break_points() {
        let text = "a".repeat(250);
        let chunks = split_message(&text, 100);

        assert_eq!(chunks.len(), 3);
        // Full chunks have no room for a tag.
        assert_eq!(chunks[0], "a".repeat(100));
        assert_eq!(chunks[1], "a".repeat(100));
        assert_eq!(chunks[2], format!("{}{}", "a".repeat(50), part_tag(3, 3)));
        assert_eq!(strip_tags(&chunks), text);
    }

    #[test]
    fn test_breaks_after_sentence_end_late_in_window() {
        // Sentence ends at index 89, which is past 80% of 100.
        let text = format!("{}.{}", "a".repeat(89), "b".repeat(60));
        let chunks = split_message(&text, 100);

        assert_eq!(chunks.len(), 2);
        // 90 characters plus the tag would overflow, so the first part is untagged.
        assert_eq!(chunks[0], format!("{}.", "a".repeat(89)));
        assert_eq!(chunks[1], format!("{}{}", "b".repeat(60), part_tag(2, 2)));
        assert_eq!(strip_tags(&chunks), text);
    }

    #[test]
    fn test_early_break_point_is_ignored() {
        // A newline at index 10 is too early to use.
        let text = format!("{}\n{}", "a".repeat(10), "b".repeat(150));
        let chunks = split_message(&text, 100);

        assert_eq!(chunks[0].chars().count(), 100);
        assert_eq!(strip_tags(&chunks), text);
    }

    #[test]
    fn test_newline_stays_with_preceding_chunk() {
        let text = format!("{}\n{}", "a".repeat(85), "b".repeat(40));
        let chunks = split_message(&text, 100);

        let first = chunks[0].strip_suffix(part_tag(1, 2).as_str()).unwrap_or(&chunks[0]);
        assert_eq!(first, format!("{}\n", "a".repeat(85)));
    }

    #[test]
    fn test_every_chunk_fits_and_nothing_is_lost() {
        let sentence = "The quick brown fox jumps over the lazy dog! Is it true? Yes.\n";
        let text = sentence.repeat(300);
        let chunks = split_message(&text, 4000);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 4000);
        }
        assert_eq!(strip_tags(&chunks), text);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let text = "é".repeat(150);
        let chunks = split_message(&text, 100);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chars().count(), 100);
        assert_eq!(strip_tags(&chunks), text);
    }
}
