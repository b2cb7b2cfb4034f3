// WHY: single-scan normalization so stopword removal cannot depend on list order
// After non-letters become spaces, a word is a maximal run of a-z and is kept or dropped whole

use super::stopwords::StopwordFilter;

/// Normalize a speaker's dialogue into space-separated vocabulary words
///
/// Steps: lowercase, replace every char outside `a-z` and whitespace with a space,
/// drop whole-word stopwords, collapse whitespace runs of two or more into one space,
/// then trim both ends.
pub fn normalize_text(text: &str, stopwords: &StopwordFilter) -> String {
    let mut result = String::with_capacity(text.len());
    normalize_text_into(text, stopwords, &mut result);
    result
}

/// Normalize into a supplied buffer so callers can reuse one allocation
pub fn normalize_text_into(text: &str, stopwords: &StopwordFilter, buffer: &mut String) {
    buffer.clear();
    buffer.reserve(text.len());

    let mut word = String::new();
    // Whitespace seen since the last kept word; removed words do not reset it
    let mut gap_len = 0usize;
    let mut gap_char = ' ';

    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() {
            word.push(ch);
            continue;
        }

        flush_word(&mut word, stopwords, buffer, &mut gap_len, gap_char);

        let ch = if ch.is_whitespace() { ch } else { ' ' };
        if gap_len == 0 {
            gap_char = ch;
        }
        gap_len += 1;
    }

    flush_word(&mut word, stopwords, buffer, &mut gap_len, gap_char);
}

fn flush_word(
    word: &mut String,
    stopwords: &StopwordFilter,
    buffer: &mut String,
    gap_len: &mut usize,
    gap_char: char,
) {
    if word.is_empty() {
        return;
    }
    if !stopwords.is_stopword(word) {
        if !buffer.is_empty() && *gap_len > 0 {
            buffer.push(if *gap_len == 1 { gap_char } else { ' ' });
        }
        buffer.push_str(word);
        *gap_len = 0;
    }
    word.clear();
}
