//! Keyword-in-context concordance.
//!
//! Matching always runs on bare tokens. Spans are token indices into the
//! tagged document, never character offsets.

use std::collections::HashSet;
use std::str::FromStr;

use log::{debug, info};
use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;

use crate::corpus::Corpus;
use crate::error::{Error, Result};
use crate::export::{Cell, Table};
use crate::language::LanguageProfile;
use crate::tagging::{TaggedDocument, tag};

/// How the keyword is matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KwicMode {
    /// Phrase match when the keyword splits into several tokens, pattern
    /// match on single tokens otherwise.
    #[default]
    Literal,
    /// The keyword is always a regular expression over single tokens.
    Regex,
}

impl KwicMode {
    /// `None` is literal mode; `Some("regex")` (or `"re"`) is regex mode.
    pub fn parse(mode: Option<&str>) -> Result<Self> {
        mode.map_or(Ok(KwicMode::Literal), str::parse)
    }
}

impl FromStr for KwicMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "regex" | "re" => Ok(KwicMode::Regex),
            "none" | "" => Ok(KwicMode::Literal),
            other => Err(Error::InvalidMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct KwicOptions {
    /// Tokens of context on each side.
    pub window: usize,
    pub mode: KwicMode,
    /// Show `token/tag` instead of bare tokens.
    pub include_pos: bool,
}

impl Default for KwicOptions {
    fn default() -> Self {
        KwicOptions {
            window: 4,
            mode: KwicMode::Literal,
            include_pos: false,
        }
    }
}

/// One keyword occurrence with its context.
///
/// An empty context means the hit touches the document boundary on that side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConcordanceHit {
    pub document: String,
    /// Token index of the first keyword token.
    pub start_index: usize,
    /// Token index of the last keyword token.
    pub end_index: usize,
    pub left_context: Vec<String>,
    pub keyword_span: Vec<String>,
    pub right_context: Vec<String>,
}

impl ConcordanceHit {
    pub fn left_text(&self) -> String {
        self.left_context.join(" ")
    }

    pub fn keyword_text(&self) -> String {
        self.keyword_span.join(" ")
    }

    pub fn right_text(&self) -> String {
        self.right_context.join(" ")
    }

    pub const COLUMNS: [&'static str; 6] = ["docname", "from", "to", "pre", "keyword", "post"];

    pub fn table(hits: &[ConcordanceHit]) -> Table {
        let mut table = Table::new(Self::COLUMNS);
        for h in hits {
            table.push_row(vec![
                Cell::from(h.document.as_str()),
                Cell::from(h.start_index),
                Cell::from(h.end_index),
                Cell::from(h.left_text()),
                Cell::from(h.keyword_text()),
                Cell::from(h.right_text()),
            ]);
        }
        table
    }
}

/// A keyword prepared for matching: its token split, plus a compiled pattern
/// when the mode matches single tokens.
///
/// A literal phrase is compared token by token and never compiled, so
/// regex metacharacters in it are ordinary text.
#[derive(Debug, Clone)]
pub struct Keyword {
    text: String,
    tokens: Vec<String>,
    pattern: Option<Regex>,
}

impl Keyword {
    pub fn new(keyword: &str, profile: &dyn LanguageProfile, mode: KwicMode) -> Result<Self> {
        let tokens = profile.split_keyword(keyword);
        let pattern = match (mode, tokens.len()) {
            (KwicMode::Regex, _) | (KwicMode::Literal, 1) => Some(Regex::new(keyword)?),
            _ => None,
        };
        Ok(Keyword {
            text: keyword.to_string(),
            tokens,
            pattern,
        })
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

/// Concordance over every document of `corpus`, in corpus order.
pub fn kwic(
    corpus: &Corpus,
    keyword: &str,
    profile: &dyn LanguageProfile,
    opts: &KwicOptions,
) -> Result<Vec<ConcordanceHit>> {
    let keyword = Keyword::new(keyword, profile, opts.mode)?;
    let hits: Vec<ConcordanceHit> = corpus
        .documents()
        .par_iter()
        .map(|d| {
            let doc = tag(&d.text, profile);
            let found = kwic_document(&d.name, &doc, &keyword, opts);
            debug!("{}: {} hits", d.name, found.len());
            found
        })
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect();
    if hits.is_empty() {
        info!("keyword {:?} not found", keyword.text);
    }
    Ok(hits)
}

/// Concordance over one tagged document. The matching mode is the one
/// `keyword` was prepared with.
pub fn kwic_document(
    name: &str,
    doc: &TaggedDocument,
    keyword: &Keyword,
    opts: &KwicOptions,
) -> Vec<ConcordanceHit> {
    match (&keyword.pattern, keyword.tokens.len()) {
        (Some(pattern), _) => single_token_hits(name, doc, pattern, opts),
        (None, n) if n > 1 => phrase_hits(name, doc, &keyword.tokens, opts),
        _ => Vec::new(),
    }
}

fn single_token_hits(
    name: &str,
    doc: &TaggedDocument,
    pattern: &Regex,
    opts: &KwicOptions,
) -> Vec<ConcordanceHit> {
    let tokens = doc.tokens();
    let surface = surface(doc, opts);
    let stream = tokens.join(" ");

    let mut seen = HashSet::new();
    let mut hits = Vec::new();
    for m in pattern.find_iter(&stream) {
        let matched = m.as_str();
        if !seen.insert(matched) {
            continue;
        }
        for (i, _) in tokens.iter().enumerate().filter(|(_, t)| *t == matched) {
            hits.push(ConcordanceHit {
                document: name.to_string(),
                start_index: i,
                end_index: i,
                left_context: left_window(surface, i, opts.window),
                keyword_span: vec![surface[i].clone()],
                right_context: right_window(surface, i, opts.window),
            });
        }
    }
    hits
}

fn phrase_hits(
    name: &str,
    doc: &TaggedDocument,
    phrase: &[String],
    opts: &KwicOptions,
) -> Vec<ConcordanceHit> {
    let tokens = doc.tokens();
    let surface = surface(doc, opts);
    let k = phrase.len();
    let (head, last) = phrase.split_at(k - 1);

    tokens
        .iter()
        .enumerate()
        .filter(|(i, t)| *t == &last[0] && *i + 1 >= k && tokens[*i + 1 - k..*i] == *head)
        .map(|(i, _)| {
            let start = i + 1 - k;
            ConcordanceHit {
                document: name.to_string(),
                start_index: start,
                end_index: i,
                left_context: left_window(surface, start, opts.window),
                keyword_span: surface[start..=i].to_vec(),
                right_context: right_window(surface, i, opts.window),
            }
        })
        .collect()
}

fn surface<'a>(doc: &'a TaggedDocument, opts: &KwicOptions) -> &'a [String] {
    if opts.include_pos {
        doc.combined()
    } else {
        doc.tokens()
    }
}

/// Up to `window` items before `index`, truncated at the start of the document.
fn left_window(items: &[String], index: usize, window: usize) -> Vec<String> {
    items[index.saturating_sub(window)..index].to_vec()
}

/// Up to `window` items after `index`, truncated at the end of the document.
fn right_window(items: &[String], index: usize, window: usize) -> Vec<String> {
    let end = (index + 1 + window).min(items.len());
    items[(index + 1).min(end)..end].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::EnglishProfile;

    fn doc_of(tokens: &[&str]) -> TaggedDocument {
        TaggedDocument::from_pairs(
            tokens
                .iter()
                .map(|t| (t.to_string(), "NN".to_string())),
        )
    }

    fn keyword(k: &str) -> Keyword {
        Keyword::new(k, &EnglishProfile, KwicMode::Literal).unwrap()
    }

    fn pattern(k: &str) -> Keyword {
        Keyword::new(k, &EnglishProfile, KwicMode::Regex).unwrap()
    }

    fn opts(window: usize) -> KwicOptions {
        KwicOptions {
            window,
            ..Default::default()
        }
    }

    #[test]
    fn single_token_windows_and_boundaries() {
        let doc = doc_of(&["a", "b", "x", "c", "d", "x", "e", "f", "g", "x"]);
        let hits = kwic_document("d", &doc, &keyword("x"), &opts(2));
        assert_eq!(hits.len(), 3);

        assert_eq!((hits[0].start_index, hits[0].end_index), (2, 2));
        assert_eq!(hits[0].left_context, ["a", "b"]);
        assert_eq!(hits[0].right_context, ["c", "d"]);

        assert_eq!(hits[1].start_index, 5);
        assert_eq!(hits[1].left_context, ["c", "d"]);

        assert_eq!(hits[2].start_index, 9);
        assert_eq!(hits[2].left_context, ["f", "g"]);
        assert!(hits[2].right_context.is_empty());
        assert_eq!(hits[2].right_text(), "");
    }

    #[test]
    fn first_token_has_empty_left_context() {
        let doc = doc_of(&["x", "a", "b"]);
        let hits = kwic_document("d", &doc, &keyword("x"), &opts(4));
        assert_eq!(hits.len(), 1);
        assert!(hits[0].left_context.is_empty());
        assert_eq!(hits[0].right_context, ["a", "b"]);
    }

    #[test]
    fn window_is_truncated_near_start() {
        let doc = doc_of(&["a", "x", "b"]);
        let hits = kwic_document("d", &doc, &keyword("x"), &opts(4));
        assert_eq!(hits[0].left_context, ["a"]);
    }

    #[test]
    fn phrase_match_reports_span_and_excludes_phrase_from_left() {
        let doc = doc_of(&["p", "q", "a", "b", "r", "a", "c", "a", "b"]);
        let hits = kwic_document("d", &doc, &keyword("a b"), &opts(2));
        assert_eq!(hits.len(), 2);

        assert_eq!((hits[0].start_index, hits[0].end_index), (2, 3));
        assert_eq!(hits[0].left_context, ["p", "q"]);
        assert_eq!(hits[0].keyword_span, ["a", "b"]);
        assert_eq!(hits[0].right_context, ["r", "a"]);

        assert_eq!((hits[1].start_index, hits[1].end_index), (7, 8));
        assert_eq!(hits[1].left_context, ["a", "c"]);
        assert!(hits[1].right_context.is_empty());
    }

    #[test]
    fn phrase_at_document_start() {
        let doc = doc_of(&["a", "b", "c"]);
        let hits = kwic_document("d", &doc, &keyword("a b"), &opts(3));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].start_index, 0);
        assert!(hits[0].left_context.is_empty());
        assert_eq!(hits[0].right_context, ["c"]);
    }

    #[test]
    fn three_token_phrase_requires_contiguity() {
        let doc = doc_of(&["a", "b", "c", "a", "x", "c", "b", "c"]);
        let hits = kwic_document("d", &doc, &keyword("a b c"), &opts(1));
        assert_eq!(hits.len(), 1);
        assert_eq!((hits[0].start_index, hits[0].end_index), (0, 2));
    }

    #[test]
    fn include_pos_changes_surface_only() {
        let doc = TaggedDocument::from_pairs(vec![
            ("dogs".to_string(), "NNS".to_string()),
            ("bark".to_string(), "VBP".to_string()),
            ("loudly".to_string(), "RB".to_string()),
        ]);
        let o = KwicOptions {
            window: 1,
            include_pos: true,
            ..Default::default()
        };
        let hits = kwic_document("d", &doc, &keyword("bark"), &o);
        assert_eq!(hits[0].left_context, ["dogs/NNS"]);
        assert_eq!(hits[0].keyword_span, ["bark/VBP"]);
        assert_eq!(hits[0].right_context, ["loudly/RB"]);
    }

    #[test]
    fn regex_mode_matches_distinct_tokens() {
        let doc = doc_of(&["cat", "cats", "dog", "cat", "catalog"]);
        let o = KwicOptions {
            window: 1,
            mode: KwicMode::Regex,
            ..Default::default()
        };
        let hits = kwic_document("d", &doc, &pattern(r"cats?\b"), &o);
        let idx: Vec<usize> = hits.iter().map(|h| h.start_index).collect();
        // "cat" group first (indices 0, 3), then "cats"
        assert_eq!(idx, vec![0, 3, 1]);
    }

    #[test]
    fn regex_mode_ignores_multi_token_matches() {
        let doc = doc_of(&["new", "york", "city"]);
        let o = KwicOptions {
            mode: KwicMode::Regex,
            ..Default::default()
        };
        assert!(kwic_document("d", &doc, &pattern("new york"), &o).is_empty());
    }

    #[test]
    fn empty_keyword_in_literal_mode_has_no_hits() {
        let doc = doc_of(&["a"]);
        assert!(kwic_document("d", &doc, &keyword("   "), &opts(4)).is_empty());
    }

    #[test]
    fn literal_phrase_with_regex_metacharacters_matches() {
        let doc = doc_of(&["see", "note", "[", "1", "]", "below", "note", "("]);
        let hits = kwic_document("d", &doc, &keyword("[ 1"), &opts(2));
        assert_eq!(hits.len(), 1);
        assert_eq!((hits[0].start_index, hits[0].end_index), (2, 3));
        assert_eq!(hits[0].left_context, ["see", "note"]);
        assert_eq!(hits[0].right_context, ["]", "below"]);

        let hits = kwic_document("d", &doc, &keyword("note ("), &opts(2));
        assert_eq!(hits.len(), 1);
        assert_eq!((hits[0].start_index, hits[0].end_index), (6, 7));
    }

    #[test]
    fn literal_phrase_is_not_compiled_over_corpus() {
        let corpus: Corpus = [("a.txt", "see note [1] below")].into_iter().collect();
        let hits = kwic(&corpus, "[ 1", &EnglishProfile, &KwicOptions::default()).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].keyword_text(), "[ 1");
        assert_eq!(hits[0].left_text(), "see note");

        let regex = KwicOptions {
            mode: KwicMode::Regex,
            ..Default::default()
        };
        assert!(matches!(
            kwic(&corpus, "[ 1", &EnglishProfile, &regex),
            Err(Error::Pattern(_))
        ));
    }

    #[test]
    fn mode_parsing() {
        assert_eq!(KwicMode::parse(None).unwrap(), KwicMode::Literal);
        assert_eq!(KwicMode::parse(Some("regex")).unwrap(), KwicMode::Regex);
        assert_eq!(KwicMode::parse(Some("re")).unwrap(), KwicMode::Regex);
        assert!(matches!(
            KwicMode::parse(Some("fuzzy")),
            Err(Error::InvalidMode(ref m)) if m == "fuzzy"
        ));
    }

    #[test]
    fn invalid_pattern_fails_before_matching() {
        let corpus: Corpus = [("a.txt", "text")].into_iter().collect();
        let err = kwic(&corpus, "(", &EnglishProfile, &KwicOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Pattern(_)));
    }

    #[test]
    fn corpus_hits_follow_document_order() {
        let corpus: Corpus = [
            ("b.txt", "the fox ran and the fox hid"),
            ("a.txt", "no match here"),
            ("c.txt", "a fox"),
        ]
        .into_iter()
        .collect();
        let hits = kwic(&corpus, "fox", &EnglishProfile, &KwicOptions::default()).unwrap();
        let docs: Vec<&str> = hits.iter().map(|h| h.document.as_str()).collect();
        assert_eq!(docs, vec!["b.txt", "b.txt", "c.txt"]);
        let table = ConcordanceHit::table(&hits);
        assert_eq!(table.columns, ConcordanceHit::COLUMNS);
        assert_eq!(table.rows[1][3], Cell::from("fox ran and the"));
    }
}
