//! English profile: Treebank-style tokenization with a Penn tag heuristic.
//!
//! The tagger is a lexicon of closed-class words plus suffix rules. It produces
//! Penn Treebank labels so the tag tables and punctuation rules line up with
//! a full statistical tagger, which can be plugged in through
//! [`LanguageProfile`] instead.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use unicode_segmentation::UnicodeSegmentation;

use super::{LanguageProfile, SentenceMarks, TagClassTable};
use crate::lexical::StatsRevision;
use crate::segment::{ABBREVIATIONS, split_english_sentences};
use crate::tagging::TaggedDocument;

pub(super) static PROFILE: Lazy<EnglishProfile> = Lazy::new(|| EnglishProfile);

pub static ENGLISH_TAGS: TagClassTable = TagClassTable {
    noun: &["NN", "NNP", "NNPS", "NNS"],
    pronoun: &["PRP", "PRP$", "WP", "WP$"],
    verb: &["VB", "VBD", "VBG", "VBN", "VBP", "VBZ"],
    adjective: &["JJ", "JJR", "JJS"],
    adverb: &["RB", "RBR", "RBS", "WRB"],
    conjunction: &["CC"],
    auxiliary: &["MD"],
    content: &[
        "NN", "NNP", "NNPS", "NNS", "VB", "VBD", "VBG", "VBN", "VBP", "VBZ", "JJ", "JJR", "JJS",
        "RB", "RBR", "RBS", "WRB", "PRP", "PRP$", "WP", "WP$", "CD", "UH",
    ],
    function: &["CC", "MD", "DT", "EX", "IN", "PDT", "RP", "TO", "WDT"],
};

static MARKS: SentenceMarks = SentenceMarks {
    period: ".",
    question: "?",
    exclamation: "!",
    comma: ",",
    semicolon: ";",
};

/// Tags excluded from the mean word length.
const SYMBOL_TAGS: &[&str] = &["$", "''", "(", ")", ",", "--", ".", ":", "``", "SYM"];

/// Tags summed into the punctuation total.
const PUNCTUATION_TAGS: &[&str] = &["''", "(", ")", ",", "--", ".", ":", "``"];

static LEXICON: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let groups: &[(&str, &[&str])] = &[
        (
            "DT",
            &[
                "the", "a", "an", "this", "these", "those", "every", "each", "some", "any", "no",
                "another", "either", "neither",
            ],
        ),
        ("PDT", &["all", "both", "half"]),
        (
            "IN",
            &[
                "of", "in", "on", "at", "by", "for", "with", "from", "about", "into", "over",
                "under", "after", "before", "between", "through", "during", "without", "within",
                "upon", "against", "among", "since", "until", "because", "if", "than", "as",
                "while", "although", "though", "whether", "that", "across", "behind", "beyond",
                "near", "toward", "towards", "onto", "per", "via",
            ],
        ),
        ("CC", &["and", "or", "but", "nor", "yet", "plus"]),
        (
            "PRP",
            &[
                "i", "you", "he", "she", "it", "we", "they", "me", "him", "us", "them", "myself",
                "yourself", "himself", "herself", "itself", "ourselves", "themselves",
            ],
        ),
        ("PRP$", &["my", "your", "his", "her", "its", "our", "their"]),
        ("WP", &["who", "whom", "what"]),
        ("WP$", &["whose"]),
        ("WDT", &["which", "whichever", "whatever"]),
        ("WRB", &["when", "where", "why", "how"]),
        (
            "MD",
            &[
                "can", "could", "may", "might", "must", "shall", "should", "will", "would", "ca",
                "wo", "'ll", "'d",
            ],
        ),
        ("TO", &["to"]),
        ("EX", &["there"]),
        ("UH", &["oh", "ah", "hey", "wow", "ouch", "hello", "alas"]),
        (
            "RB",
            &[
                "not", "n't", "very", "also", "never", "too", "quite", "just", "often", "always",
                "here", "then", "now", "only", "again", "still", "already", "soon", "even",
                "so", "ever", "rather", "almost", "perhaps",
            ],
        ),
        ("RBR", &["more", "less"]),
        ("RBS", &["most", "least"]),
        ("VBZ", &["is", "has", "does"]),
        ("VBP", &["are", "am", "have", "do", "'re", "'ve", "'m"]),
        ("VBD", &["was", "were", "had", "did", "said", "went", "came", "made", "took", "saw"]),
        ("VB", &["be"]),
        ("VBN", &["been", "done", "gone", "seen", "taken", "given"]),
        ("VBG", &["being"]),
        ("POS", &["'s"]),
        ("JJ", &["good", "new", "old", "great", "big", "small", "long", "little", "own"]),
        ("JJR", &["better", "worse", "larger", "smaller"]),
        ("JJS", &["best", "worst"]),
    ];
    groups
        .iter()
        .flat_map(|(tag, words)| words.iter().map(move |w| (*w, *tag)))
        .collect()
});

const CONTRACTIONS: &[&str] = &["n't", "'s", "'re", "'ve", "'ll", "'d", "'m"];

#[derive(Debug, Default)]
pub struct EnglishProfile;

impl LanguageProfile for EnglishProfile {
    fn code(&self) -> &str {
        "en"
    }

    fn tag_pairs(&self, text: &str) -> Vec<(String, String)> {
        let tokens = tokenize_english(text);
        let mut pairs = Vec::with_capacity(tokens.len());
        let mut sentence_start = true;
        for token in tokens {
            let tag = tag_token(&token, sentence_start);
            sentence_start = tag == ".";
            pairs.push((token, tag.to_string()));
        }
        pairs
    }

    fn split_keyword(&self, keyword: &str) -> Vec<String> {
        keyword.split_whitespace().map(String::from).collect()
    }

    fn segment(&self, text: &str) -> Vec<String> {
        split_english_sentences(text)
    }

    fn tag_classes(&self) -> &TagClassTable {
        &ENGLISH_TAGS
    }

    fn sentence_marks(&self) -> &SentenceMarks {
        &MARKS
    }

    fn is_symbol(&self, _token: &str, tag: &str, _revision: StatsRevision) -> bool {
        SYMBOL_TAGS.contains(&tag)
    }

    fn punctuation_total(&self, doc: &TaggedDocument, _revision: StatsRevision) -> usize {
        doc.tags()
            .iter()
            .filter(|t| PUNCTUATION_TAGS.contains(&t.as_str()))
            .count()
    }
}

/// Split English text into Treebank-style tokens.
///
/// Tokens start from Unicode word boundaries (UAX #29). On top of them,
/// double quotes become ``` `` ``` or `''` by position, contractions are
/// split (`don't` -> `do`, `n't`), hyphenated words are rejoined, runs of
/// periods and dashes merge into `...` and `--`, and a period stays attached
/// to an abbreviation unless it ends the text.
pub fn tokenize_english(text: &str) -> Vec<String> {
    let pieces: Vec<&str> = text.split_word_bounds().collect();
    let last_solid = pieces.iter().rposition(|p| !p.trim().is_empty());
    let mut out = Vec::new();
    // a double quote here opens a quotation
    let mut opening = true;
    let mut i = 0;

    while i < pieces.len() {
        let piece = pieces[i];
        if piece.trim().is_empty() {
            opening = true;
            i += 1;
            continue;
        }

        if is_word(piece) {
            let mut word = piece.to_string();
            while pieces.get(i + 1) == Some(&"-") && pieces.get(i + 2).is_some_and(|p| is_word(p)) {
                word.push('-');
                word.push_str(pieces[i + 2]);
                i += 2;
            }
            if pieces.get(i + 1) == Some(&".") && last_solid != Some(i + 1) && is_abbreviation(&word)
            {
                word.push('.');
                out.push(word);
                i += 2;
            } else {
                split_contraction(&word, &mut out);
                i += 1;
            }
            opening = false;
            continue;
        }

        let run = pieces[i..].iter().take_while(|p| **p == piece).count();
        let token = match piece {
            "“" => "``".to_string(),
            "\"" if opening => "``".to_string(),
            "\"" | "”" => "''".to_string(),
            "-" if run > 1 => "--".to_string(),
            "." if run > 1 => piece.repeat(run),
            _ => piece.to_string(),
        };
        i += if matches!(piece, "-" | ".") { run } else { 1 };
        opening = matches!(token.as_str(), "(" | "[" | "{" | "``");
        out.push(token);
    }
    out
}

fn is_word(piece: &str) -> bool {
    piece.chars().next().is_some_and(char::is_alphanumeric)
}

fn split_contraction(word: &str, out: &mut Vec<String>) {
    let lower = word.to_lowercase();
    for suffix in CONTRACTIONS {
        if lower.len() > suffix.len() && lower.ends_with(suffix) {
            let cut = word.len() - suffix.len();
            if word.is_char_boundary(cut) {
                out.push(word[..cut].to_string());
                out.push(word[cut..].to_string());
                return;
            }
        }
    }
    out.push(word.to_string());
}

fn is_abbreviation(stem: &str) -> bool {
    let lower = stem.to_lowercase();
    ABBREVIATIONS.contains(&lower.as_str())
        || (stem.chars().count() == 1 && stem.chars().all(char::is_alphabetic))
        || (stem.contains('.') && stem.chars().all(|c| c.is_alphabetic() || c == '.'))
}

fn tag_token(token: &str, sentence_start: bool) -> &'static str {
    if let Some(tag) = punctuation_tag(token) {
        return tag;
    }
    if is_number(token) {
        return "CD";
    }
    let lower = token.to_lowercase();
    if let Some(tag) = LEXICON.get(lower.as_str()) {
        return tag;
    }
    let first_upper = token.chars().next().is_some_and(char::is_uppercase);
    if first_upper && !sentence_start {
        return "NNP";
    }
    suffix_tag(&lower)
}

fn punctuation_tag(token: &str) -> Option<&'static str> {
    let tag = match token {
        "." | "?" | "!" => ".",
        "," => ",",
        ";" | ":" | "..." | "-" => ":",
        "--" => ":",
        "(" | "[" | "{" => "(",
        ")" | "]" | "}" => ")",
        "``" | "‘" | "`" => "``",
        "''" | "’" | "'" => "''",
        "$" => "$",
        "#" => "#",
        _ if token.chars().all(|c| !c.is_alphanumeric()) => "SYM",
        _ => return None,
    };
    Some(tag)
}

fn is_number(token: &str) -> bool {
    token.chars().any(|c| c.is_ascii_digit())
        && token
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '%' | '/'))
}

fn suffix_tag(lower: &str) -> &'static str {
    let len = lower.chars().count();
    if len > 3 && lower.ends_with("ly") {
        "RB"
    } else if len > 4 && lower.ends_with("ing") {
        "VBG"
    } else if len > 3 && lower.ends_with("ed") {
        "VBD"
    } else if len > 4 && lower.ends_with("est") {
        "JJS"
    } else if len > 4
        && ["ous", "ful", "ive", "able", "ible", "al", "ic", "less"]
            .iter()
            .any(|s| lower.ends_with(s))
    {
        "JJ"
    } else if len > 3 && lower.ends_with('s') && !lower.ends_with("ss") {
        "NNS"
    } else {
        "NN"
    }
}
