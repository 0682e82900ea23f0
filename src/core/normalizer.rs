//! Name normalization and letter-base derivation.

use std::sync::LazyLock;

use regex::Regex;

/// 字母基底長度
pub const BASE_LEN: usize = 5;
/// 名字被清空時使用的字母
pub const FALLBACK_LETTERS: &str = "user";
const PAD_CHAR: char = 'x';

static ASIDE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"".*?"|\(.*?\)"#).expect("aside pattern is valid"));
static DISALLOWED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z\s-]").expect("filter pattern is valid"));
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Only these three letters are transliterated; other non-ASCII letters are dropped later.
fn transliterate(ch: char) -> char {
    match ch {
        'å' | 'ä' => 'a',
        'ö' => 'o',
        other => other,
    }
}

/// Turns a raw display name into lowercase ASCII tokens.
///
/// Quoted nicknames and parenthesized asides are removed before the character
/// filter, so `Åsa ("Sally") Öberg` becomes `["asa", "oberg"]`.
pub fn normalize(raw: &str) -> Vec<String> {
    let lowered: String = raw.to_lowercase().chars().map(transliterate).collect();
    let without_asides = ASIDE_RE.replace_all(&lowered, " ");
    let filtered = DISALLOWED_RE.replace_all(&without_asides, "");
    let collapsed = WHITESPACE_RE.replace_all(&filtered, " ");

    collapsed
        .trim()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// First 3 letters of the first token plus first 2 of the last, or the first 5 of a lone token.
/// Always exactly [`BASE_LEN`] characters, padded with `x`.
pub fn letter_base(tokens: &[String]) -> String {
    let letters: String = match tokens {
        [] => FALLBACK_LETTERS.to_string(),
        [only] => only.chars().take(BASE_LEN).collect(),
        [first, .., last] => first.chars().take(3).chain(last.chars().take(2)).collect(),
    };

    let mut base: String = letters.chars().take(BASE_LEN).collect();
    while base.chars().count() < BASE_LEN {
        base.push(PAD_CHAR);
    }
    base
}
