//! Display-path text normalization for incident descriptions and work notes.
//!
//! [`clean_display_text`] is a pure, total, deterministic pipeline that
//! repairs the usual damage found in concatenated ticket text: missing
//! sentence delimiters, HTML entity remnants, typo/emphasis repetition, and
//! copy-paste phrase duplication. It is used for display and exact matching;
//! the embedding path lives in [`crate::preprocess`] and must not be
//! conflated with this one.

use once_cell::sync::Lazy;
use regex::Regex;

/// `xxxThis is` → `xxx. This is` (recover a missing sentence delimiter).
static MISSING_DELIMITER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z])([A-Z])").expect("static regex"));

/// Leftover HTML entities from ticket exports.
static HTML_ENTITY: Lazy<Regex> = Lazy::new(|| Regex::new(r"&gt|&lt").expect("static regex"));

/// Stray punctuation immediately before a period, e.g. `xxx!!.` → `xxx.`.
static PUNCT_BEFORE_PERIOD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\W+?\.").expect("static regex"));

/// Sentence-ending punctuation glued to the next word: `end.next` → `end. next`.
static MISSING_SPACE_AFTER_SENTENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([.?!])(\w)").expect("static regex"));

/// Everything except word chars, digits, whitespace, newline, colon,
/// backslash, hyphen, and period.
static DISALLOWED_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\n\d :\\.-]").expect("static regex"));

/// Clean a raw description or work note for display and exact matching.
///
/// The pipeline order is fixed; each step is applied exactly once. The
/// repeated-phrase collapse (step 8) is a single pass and is not iterated to
/// a fixed point: an outer repetition can re-form after an inner one is
/// collapsed, and that residue is accepted (see the property test below).
pub fn clean_display_text(text: &str) -> String {
    // 1. missing delimiter between concatenated sentences (before lowercasing)
    let s = MISSING_DELIMITER.replace_all(text, "${1}. ${2}");
    // 2. lower case
    let s = s.to_lowercase();
    // 3. HTML entity remnants
    let s = HTML_ENTITY.replace_all(&s, " ");
    // 4. letter repetition (3+ of the same letter)
    let s = collapse_letter_runs(&s);
    // 5. non-word repetition (2+ of the same non-word char)
    let s = collapse_nonword_runs(&s);
    // 6. xxx[?!]. → xxx.
    let s = PUNCT_BEFORE_PERIOD.replace_all(&s, ".");
    // 7. [.?!]xxx → [.?!] xxx
    let s = MISSING_SPACE_AFTER_SENTENCE.replace_all(&s, "${1} ${2}");
    // 8. phrase repetition
    let s = collapse_repeated_phrases(&s);
    // 9. strip punctuation other than .\n:- and backslash
    let s = DISALLOWED_CHARS.replace_all(&s, "");
    // 10. trim
    s.trim().to_string()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Collapse runs of 3+ identical ASCII lowercase letters to one occurrence.
/// Runs of exactly two ("ll", "oo") are legitimate spelling and kept.
fn collapse_letter_runs(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let mut run = 1;
        while i + run < chars.len() && chars[i + run] == c {
            run += 1;
        }
        if c.is_ascii_lowercase() && run >= 3 {
            out.push(c);
        } else {
            for _ in 0..run {
                out.push(c);
            }
        }
        i += run;
    }
    out
}

/// Collapse runs of 2+ identical non-word characters to one occurrence.
fn collapse_nonword_runs(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let mut run = 1;
        while i + run < chars.len() && chars[i + run] == c {
            run += 1;
        }
        if !is_word_char(c) && run >= 2 {
            out.push(c);
        } else {
            for _ in 0..run {
                out.push(c);
            }
        }
        i += run;
    }
    out
}

/// Collapse an immediately repeated phrase (length >= 2) to one occurrence.
///
/// Mirrors the lazy-group semantics of `(.{2,}?)\1{1,}`: at each position the
/// shortest repeating chunk of at least two characters wins, all consecutive
/// copies are consumed, and scanning resumes after the collapsed region.
/// Phrases never span a newline. The regex engine used elsewhere in this
/// module has no backreferences, so this step is an explicit scan.
fn collapse_repeated_phrases(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let n = chars.len();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    'scan: while i < n {
        let remaining = n - i;
        for len in 2..=remaining / 2 {
            let chunk = &chars[i..i + len];
            if chunk.contains(&'\n') {
                break;
            }
            if chunk == &chars[i + len..i + 2 * len] {
                let mut end = i + 2 * len;
                while end + len <= n && chunk == &chars[end..end + len] {
                    end += len;
                }
                out.extend(chunk.iter());
                i = end;
                continue 'scan;
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}
