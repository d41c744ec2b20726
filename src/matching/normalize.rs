//! Title canonicalization for storefront listing comparison.

use deunicode::deunicode;
use regex_lite::Regex;
use std::sync::LazyLock;

/// Edition and remaster noise stripped from titles before comparing.
pub const DEFAULT_NOISE_TOKENS: &[&str] =
    &["HD", "REMASTER", "DEFINITIVE EDITION", "DELUXE", "STANDARD", "EDITION"];

static DEFAULT_NOISE: LazyLock<Option<Regex>> =
    LazyLock::new(|| noise_pattern(DEFAULT_NOISE_TOKENS).unwrap());

/// Turns raw listing titles into a comparable canonical form.
///
/// The pipeline upper-cases, folds the text to ASCII (dropping trademark signs and
/// unifying apostrophes), swaps whole-token Roman numerals I-X for digits, removes
/// noise tokens and trims. Applying it twice yields the same string as applying it once.
#[derive(Debug, Clone)]
pub struct TitleNormalizer {
    noise: Option<Regex>,
}

impl TitleNormalizer {
    /// Creates a normalizer that strips the given noise tokens.
    pub fn new<S: AsRef<str>>(noise_tokens: &[S]) -> Result<Self, regex_lite::Error> {
        Ok(Self { noise: noise_pattern(noise_tokens)? })
    }

    /// Normalizes a title. Empty input yields empty output.
    pub fn normalize(&self, title: &str) -> String {
        let folded = fold_ascii(&title.to_uppercase());
        let numbered = replace_roman_numerals(&folded);

        let Some(noise) = &self.noise else {
            return numbered.trim().to_string();
        };

        // Removing one token can join the words of a longer phrase, so strip until stable.
        let mut stripped = numbered;
        loop {
            let next = noise.replace_all(&stripped, "").into_owned();
            if next == stripped {
                break;
            }
            stripped = next;
        }
        stripped.trim().to_string()
    }
}

impl Default for TitleNormalizer {
    fn default() -> Self {
        Self { noise: DEFAULT_NOISE.clone() }
    }
}

/// Normalizes a title with the default noise tokens.
pub fn normalize_title(title: &str) -> String {
    TitleNormalizer::default().normalize(title)
}

/// Builds a case-insensitive whole-word alternation, longest phrases first so that
/// "DEFINITIVE EDITION" wins over "EDITION".
fn noise_pattern<S: AsRef<str>>(tokens: &[S]) -> Result<Option<Regex>, regex_lite::Error> {
    let mut phrases: Vec<String> = tokens
        .iter()
        .map(|t| t.as_ref().split_whitespace().map(regex_lite::escape).collect::<Vec<_>>())
        .filter(|words| !words.is_empty())
        .map(|words| words.join(r"\s+"))
        .collect();

    if phrases.is_empty() {
        return Ok(None);
    }

    phrases.sort_by_key(|p| std::cmp::Reverse(p.len()));
    Regex::new(&format!(r"(?i)\b(?:{})\b", phrases.join("|"))).map(Some)
}

/// Transliterates to upper-case ASCII, dropping trademark signs and unifying apostrophes.
fn fold_ascii(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '®' | '™'))
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' | '\u{02BC}' | '\u{00B4}' | '`' => '\'',
            other => other,
        })
        .collect();

    deunicode(&cleaned).to_ascii_uppercase()
}

/// Replaces tokens that are exactly a Roman numeral from I to X.
///
/// A token is a maximal run of ASCII alphanumerics, so "VIVID" or "XCOM" stay intact
/// while "X-COM" becomes "10-COM".
fn replace_roman_numerals(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut token = String::new();

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            token.push(c);
        } else {
            flush_token(&mut out, &mut token);
            out.push(c);
        }
    }
    flush_token(&mut out, &mut token);

    out
}

fn flush_token(out: &mut String, token: &mut String) {
    match roman_value(token) {
        Some(arabic) => out.push_str(arabic),
        None => out.push_str(token),
    }
    token.clear();
}

fn roman_value(token: &str) -> Option<&'static str> {
    let arabic = match token {
        "I" => "1",
        "II" => "2",
        "III" => "3",
        "IV" => "4",
        "V" => "5",
        "VI" => "6",
        "VII" => "7",
        "VIII" => "8",
        "IX" => "9",
        "X" => "10",
        _ => return None,
    };
    Some(arabic)
}
