//! Sentence and clause segmentation.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::error::Result;
use crate::language::profile_for;

// Terminator followed by an ordinary character: break between them.
static ZH_SENTENCE_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([。！？…])([^”’。！？… ）》】」])").expect("valid regex"));
// Terminator followed by a closing quote or bracket: break after the closer.
static ZH_SENTENCE_CLOSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([。！？…])([”’ ）》】」])").expect("valid regex"));

static ZH_CLAUSE_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([，；：。！？])([^”’。！？… ）》】」])").expect("valid regex"));
static ZH_CLAUSE_CLOSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([，；：。！？])([”’ ）》】」])").expect("valid regex"));

/// Lowercased words whose trailing period does not end an English sentence.
pub(crate) const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "mt", "vs", "etc", "e.g", "i.e", "cf",
    "inc", "ltd", "co", "corp", "dept", "fig", "no", "vol", "jan", "feb", "mar", "apr", "jun",
    "jul", "aug", "sep", "sept", "oct", "nov", "dec", "gen", "gov", "sen", "rep", "capt", "col",
    "lt", "sgt", "approx", "ca", "u.s", "u.k", "a.m", "p.m",
];

/// Split `text` into sentences using the rules of language `code`.
pub fn segment(text: &str, code: &str) -> Result<Vec<String>> {
    Ok(profile_for(code)?.segment(text))
}

/// Chinese sentence split on `。！？…`, keeping closing quotes and brackets
/// with the sentence they close. Empty pieces are dropped.
pub fn split_chinese_sentences(text: &str) -> Vec<String> {
    let text = ZH_SENTENCE_OPEN.replace_all(text, "$1\n$2");
    let text = ZH_SENTENCE_CLOSE.replace_all(&text, "$1$2\n");
    text.split('\n')
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Chinese clause split on `，；：。！？`. Empty pieces are kept, they count
/// as zero-length clauses.
pub fn split_chinese_clauses(text: &str) -> Vec<String> {
    let text = ZH_CLAUSE_OPEN.replace_all(text, "$1\n$2");
    let text = ZH_CLAUSE_CLOSE.replace_all(&text, "$1$2\n");
    text.split('\n').map(String::from).collect()
}

/// English sentence split on Unicode sentence boundaries (UAX #29).
///
/// Two corrections run on top of the boundaries: a period after a known
/// abbreviation does not end the sentence, and a plain word followed by a
/// period does end it even when the next word starts in lowercase.
pub fn split_english_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut pending = String::new();
    for bound in text.split_sentence_bounds() {
        for piece in split_lowercase_restarts(bound) {
            pending.push_str(piece);
            if ends_with_abbreviation(&pending) {
                continue;
            }
            push_trimmed(&mut sentences, &pending);
            pending.clear();
        }
    }
    push_trimmed(&mut sentences, &pending);
    sentences
}

/// Cut `sentence` before every lowercase word that follows `word. `.
fn split_lowercase_restarts(sentence: &str) -> Vec<&str> {
    let words: Vec<(usize, &str)> = sentence.split_word_bound_indices().collect();
    let mut pieces = Vec::new();
    let mut start = 0;
    for w in words.windows(4) {
        let &[(_, prev), (_, dot), (_, gap), (at, next)] = w else {
            continue;
        };
        if dot == "."
            && gap.chars().all(char::is_whitespace)
            && next.starts_with(char::is_lowercase)
            && prev.chars().all(char::is_alphabetic)
            && !is_abbreviation(prev)
        {
            pieces.push(&sentence[start..at]);
            start = at;
        }
    }
    pieces.push(&sentence[start..]);
    pieces
}

fn ends_with_abbreviation(pending: &str) -> bool {
    let Some(before) = pending.trim_end().strip_suffix('.') else {
        return false;
    };
    let word = before
        .rsplit(|c: char| c.is_whitespace() || c == '(' || c == '"')
        .next()
        .unwrap_or("");
    is_abbreviation(word)
}

fn is_abbreviation(word: &str) -> bool {
    ABBREVIATIONS.contains(&word.to_lowercase().as_str())
}

fn push_trimmed(sentences: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        sentences.push(piece.to_string());
    }
}
