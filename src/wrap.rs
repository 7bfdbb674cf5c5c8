//! Reflow text into fixed-width display lines.

use textwrap::core::Fragment;
use textwrap::wrap_algorithms::wrap_first_fit;

/// A whitespace-separated word, measured in chars rather than terminal columns.
#[derive(Debug)]
struct Word<'a> {
    text: &'a str,
    chars: usize,
}

impl Fragment for Word<'_> {
    fn width(&self) -> f64 {
        self.chars as f64
    }

    fn whitespace_width(&self) -> f64 {
        1.0
    }

    fn penalty_width(&self) -> f64 {
        0.0
    }
}

/// Greedily pack the words of `text` into lines of at most `width` chars.
///
/// Whitespace runs collapse to single spaces and words are never split, so a
/// word longer than `width` sits alone on its own line. Blank input yields no
/// lines.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let words: Vec<Word> = text
        .split_whitespace()
        .map(|text| Word {
            text,
            chars: text.chars().count(),
        })
        .collect();
    if words.is_empty() {
        return Vec::new();
    }

    wrap_first_fit(&words, &[width as f64])
        .into_iter()
        .map(|line| {
            line.iter()
                .map(|word| word.text)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}
