//! Text chunking for Telegram's message size limit
//!
//! Telegram caps messages at 4096 characters. Replies are conversational
//! prose, so splitting prefers paragraph boundaries, then sentence
//! boundaries, then falls back to a hard character split.

/// Default chunk size limit (leaves margin from Telegram's 4096 hard cap)
const DEFAULT_LIMIT: usize = 4000;

/// Split `text` into non-empty chunks of at most `limit` characters.
///
/// When `limit` is 0 the default limit is used.
#[must_use]
pub fn chunk_text(text: &str, limit: usize) -> Vec<String> {
    let limit = if limit == 0 { DEFAULT_LIMIT } else { limit };
    let text = text.trim();

    if text.is_empty() {
        return Vec::new();
    }
    if text.chars().count() <= limit {
        return vec![text.to_string()];
    }

    let paragraphs: Vec<&str> = text.split("\n\n").collect();
    assemble(&paragraphs, "\n\n", limit, split_sentences)
}

/// Sentence-level fallback for oversized paragraphs
fn split_sentences(text: &str, limit: usize) -> Vec<String> {
    let mut segments = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();

    for i in 0..bytes.len().saturating_sub(1) {
        if matches!(bytes[i], b'.' | b'!' | b'?') && bytes[i + 1] == b' ' {
            segments.push(&text[start..=i + 1]);
            start = i + 2;
        }
    }
    if start < text.len() {
        segments.push(&text[start..]);
    }

    assemble(&segments, " ", limit, hard_split)
}

/// Character-offset fallback for oversized sentences
fn hard_split(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        if current.chars().count() >= limit {
            chunks.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    if !current.trim().is_empty() {
        chunks.push(current);
    }

    chunks.into_iter().map(|c| c.trim().to_string()).filter(|c| !c.is_empty()).collect()
}

/// Accumulate segments into chunks up to `limit`, delegating oversized
/// segments to `fallback`.
fn assemble(
    segments: &[&str],
    separator: &str,
    limit: usize,
    fallback: fn(&str, usize) -> Vec<String>,
) -> Vec<String> {
    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();

    for segment in segments {
        let trimmed = segment.trim();
        if trimmed.is_empty() {
            continue;
        }

        let needed = if current.is_empty() {
            trimmed.chars().count()
        } else {
            current.chars().count() + separator.len() + trimmed.chars().count()
        };

        if needed <= limit {
            if !current.is_empty() {
                current.push_str(separator);
            }
            current.push_str(trimmed);
            continue;
        }

        if !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }

        if trimmed.chars().count() <= limit {
            current.push_str(trimmed);
        } else {
            chunks.extend(fallback(trimmed, limit));
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_returns_no_chunks() {
        assert!(chunk_text("", 100).is_empty());
        assert!(chunk_text("   ", 100).is_empty());
    }

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(chunk_text("Hallo Welt", 100), vec!["Hallo Welt"]);
    }

    #[test]
    fn zero_limit_uses_default() {
        assert_eq!(chunk_text("Hi", 0), vec!["Hi"]);
    }

    #[test]
    fn splits_on_paragraphs() {
        let text = "Erster Absatz.\n\nZweiter Absatz.\n\nDritter Absatz.";
        let chunks = chunk_text(text, 30);
        assert!(chunks.len() >= 2);
        assert!(chunks.iter().all(|c| c.chars().count() <= 30));
        let joined = chunks.join(" ");
        for part in ["Erster", "Zweiter", "Dritter"] {
            assert!(joined.contains(part));
        }
    }

    #[test]
    fn merges_small_paragraphs() {
        let text = "A.\n\nB.\n\nC.";
        assert_eq!(chunk_text(text, 100), vec!["A.\n\nB.\n\nC."]);
    }

    #[test]
    fn falls_back_to_sentences() {
        let text = "Hallo Welt. Das ist ein Test. Noch ein Satz hier. Und einer mehr.";
        let chunks = chunk_text(text, 40);
        assert!(chunks.len() >= 2);
        assert!(chunks.iter().all(|c| c.chars().count() <= 40));
    }

    #[test]
    fn hard_splits_unbroken_text() {
        let text = "x".repeat(25);
        let chunks = chunk_text(&text, 10);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
        assert_eq!(chunks.join(""), text);
    }

    #[test]
    fn no_empty_chunks() {
        let text = "A\n\n\n\nB\n\n\n\n\n\nC";
        let chunks = chunk_text(text, 5);
        assert!(chunks.iter().all(|c| !c.is_empty()));
    }

    #[test]
    fn multibyte_hard_split_is_char_safe() {
        let text = "ä".repeat(30);
        let chunks = chunk_text(&text, 8);
        assert!(chunks.iter().all(|c| c.chars().count() <= 8));
        assert_eq!(chunks.join(""), text);
    }
}
