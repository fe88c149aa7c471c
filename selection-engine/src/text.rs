//! Text cleanup for speech: sanitizing reply bodies and splitting story
//! text into narration sentences.

use regex::Regex;
use std::sync::LazyLock;
use threadpick_core::{NarrationParser, TextSanitizer};

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"((http|https)://)?[a-zA-Z0-9./?:@\-_=#]+\.([a-zA-Z]){2,6}([a-zA-Z0-9.&/?:@\-_=#])*")
        .expect("valid url regex")
});

// Apostrophes are only dropped when they do not sit inside a word.
static SYMBOL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\s['’]|['’]\s|[\^_~@!&;#:%—“”‘"*/{}\[\]()\\|<>=+\-]"#)
        .expect("valid symbol regex")
});

static EMOJI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{Extended_Pictographic}\p{Emoji_Modifier}\u{1F1E6}-\u{1F1FF}\u{200D}\u{FE0F}]")
        .expect("valid emoji regex")
});

const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "etc", "e.g", "i.e", "approx",
    "no", "fig", "mt", "lt", "col", "gen", "sgt", "capt",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct Sanitizer {
    strip_emoji: bool,
}

impl Sanitizer {
    pub const fn new(strip_emoji: bool) -> Self {
        Self { strip_emoji }
    }
}

impl TextSanitizer for Sanitizer {
    fn sanitize(&self, text: &str) -> String {
        let without_urls = URL_RE.replace_all(text, " ");
        let mut cleaned = SYMBOL_RE.replace_all(&without_urls, " ").into_owned();
        if self.strip_emoji {
            cleaned = EMOJI_RE.replace_all(&cleaned, "").into_owned();
        }
        cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// Splits story text into sentences, dropping the ones with nothing left to
/// say after sanitizing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentenceSplitter {
    sanitizer: Sanitizer,
}

impl SentenceSplitter {
    pub const fn new(sanitizer: Sanitizer) -> Self {
        Self { sanitizer }
    }
}

impl NarrationParser for SentenceSplitter {
    fn parse(&self, text: &str) -> Vec<String> {
        split_sentences(&text.replace('\n', " "))
            .into_iter()
            .filter(|sentence| !self.sanitizer.sanitize(sentence).is_empty())
            .collect()
    }
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '…')
}

fn is_closer(c: char) -> bool {
    matches!(c, '"' | '\'' | ')' | ']' | '”' | '’')
}

/// A trailing word like `Dr.` or `J.` does not end a sentence.
fn ends_with_abbreviation(sentence: &str) -> bool {
    let Some(word) = sentence.split_whitespace().last() else {
        return false;
    };
    let Some(stem) = word.strip_suffix('.') else {
        return false;
    };
    if stem.ends_with('.') && !stem.contains(|c: char| c.is_alphabetic()) {
        return false;
    }
    let stem = stem.trim_start_matches(|c: char| !c.is_alphanumeric());
    let mut chars = stem.chars();
    if let (Some(first), None) = (chars.next(), chars.next()) {
        return first.is_uppercase();
    }
    ABBREVIATIONS.contains(&stem.to_lowercase().as_str())
}

fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if !is_terminator(c) {
            continue;
        }
        while let Some(&next) = chars.peek() {
            if is_terminator(next) || is_closer(next) {
                current.push(next);
                chars.next();
            } else {
                break;
            }
        }
        let at_break = chars.peek().map_or(true, |next| next.is_whitespace());
        if at_break && !ends_with_abbreviation(&current) {
            let sentence = current.trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            current.clear();
        }
    }

    let rest = current.trim();
    if !rest.is_empty() {
        sentences.push(rest.to_string());
    }
    sentences
}
