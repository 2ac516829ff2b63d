//! Text shaping for spoken responses
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.1.0: Add char-bounded truncation for QA context and summary fallbacks
//! - 1.0.0: Split long responses into speakable segments

/// Longest segment handed to a single TTS invocation
pub const SPEECH_SEGMENT_LIMIT: usize = 400;

/// Split a response into segments no longer than `max_len` bytes.
///
/// Line breaks are kept as segment boundaries (headlines, forecast days and
/// event lists are one item per line). A line longer than the limit is split
/// on whitespace, and a single word longer than the limit is split on char
/// boundaries.
pub fn speech_segments(text: &str, max_len: usize) -> Vec<String> {
    let mut segments = Vec::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if line.len() <= max_len {
            segments.push(line.to_string());
            continue;
        }

        let mut current = String::new();
        for word in line.split_whitespace() {
            let needed = if current.is_empty() {
                word.len()
            } else {
                current.len() + 1 + word.len()
            };
            if needed > max_len && !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
            if word.len() > max_len {
                segments.extend(split_on_char_boundaries(word, max_len));
                continue;
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        if !current.is_empty() {
            segments.push(current);
        }
    }

    segments
}

fn split_on_char_boundaries(word: &str, max_len: usize) -> Vec<String> {
    let mut result = Vec::new();
    let mut current = String::new();

    for ch in word.chars() {
        if current.len() + ch.len_utf8() > max_len && !current.is_empty() {
            result.push(std::mem::take(&mut current));
        }
        current.push(ch);
    }
    if !current.is_empty() {
        result.push(current);
    }
    result
}

/// Keep at most `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}

/// Keep at most `max_words` words, appending "..." when anything was dropped.
pub fn truncate_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        words.join(" ")
    } else {
        format!("{}...", words[..max_words].join(" "))
    }
}
