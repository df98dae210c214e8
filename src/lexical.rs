//! Lexical and sentence statistics.
//!
//! Two revisions of the statistics exist and their numbers differ, so the
//! caller picks one with [`StatsRevision`]:
//!
//! * `Original` counts only content and function words, reports STTR in the
//!   fifth column and, for Chinese, excludes a fine-grained list of
//!   punctuation tokens from the mean word length.
//! * `Revised` counts every token, reports `words` (tokens minus
//!   punctuation) in the fifth column and excludes the `x`/`w` tags.

use std::collections::{HashMap, HashSet};

use clap::ValueEnum;
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::Serialize;

use crate::corpus::{Corpus, Document};
use crate::error::{Error, Result};
use crate::export::{Cell, Table};
use crate::language::{LanguageProfile, TagClassTable, WordClass};
use crate::segment::split_chinese_clauses;
use crate::tagging::{TaggedDocument, tag};

/// Size of the chunks STTR averages over.
pub const STTR_CHUNK: usize = 1000;

/// Which behavior of the statistics to reproduce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ValueEnum)]
pub enum StatsRevision {
    #[default]
    Original,
    Revised,
}

/// How STTR treats a trailing chunk shorter than [`STTR_CHUNK`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ValueEnum)]
pub enum SttrPolicy {
    /// The short chunk contributes a TTR of 0 and still counts in the mean.
    #[default]
    Padded,
    /// Only complete chunks count; with none, the plain TTR is used.
    Corrected,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StatsOptions {
    pub revision: StatsRevision,
    pub sttr: SttrPolicy,
    /// Collect per-document failures instead of aborting the whole table.
    pub isolate_failures: bool,
}

/// Rows that were computed plus `(document, error)` for those that failed.
#[derive(Debug, Clone)]
pub struct StatsReport<T> {
    pub rows: Vec<T>,
    pub failed: Vec<(String, String)>,
}

impl<T> Default for StatsReport<T> {
    fn default() -> Self {
        StatsReport {
            rows: Vec::new(),
            failed: Vec::new(),
        }
    }
}

/// Type-token ratio of `words`, `None` when empty.
pub fn ttr<S: AsRef<str>>(words: &[S]) -> Option<f64> {
    if words.is_empty() {
        return None;
    }
    let types: HashSet<&str> = words.iter().map(AsRef::as_ref).collect();
    Some(types.len() as f64 / words.len() as f64)
}

/// Standardized type-token ratio over chunks of [`STTR_CHUNK`] words.
pub fn sttr<S: AsRef<str>>(words: &[S], policy: SttrPolicy) -> f64 {
    let full: Vec<f64> = words
        .chunks(STTR_CHUNK)
        .filter(|c| c.len() == STTR_CHUNK)
        .filter_map(ttr)
        .collect();
    match policy {
        SttrPolicy::Padded => {
            // an empty sequence still forms one (short) chunk
            let chunks = words.len().div_ceil(STTR_CHUNK).max(1);
            full.iter().sum::<f64>() / chunks as f64
        }
        SttrPolicy::Corrected => {
            if full.is_empty() {
                ttr(words).unwrap_or(0.0)
            } else {
                full.iter().sum::<f64>() / full.len() as f64
            }
        }
    }
}

/// Average character length of tokens that are not punctuation or symbols.
pub fn mean_word_length(
    name: &str,
    doc: &TaggedDocument,
    profile: &dyn LanguageProfile,
    revision: StatsRevision,
) -> Result<f64> {
    let (count, length) = doc
        .pairs()
        .filter(|(w, t)| !profile.is_symbol(w, t, revision))
        .fold((0usize, 0usize), |(n, len), (w, _)| {
            (n + 1, len + w.chars().count())
        });
    if count == 0 {
        return Err(Error::zero(name, "non-punctuation tokens"));
    }
    Ok(length as f64 / count as f64)
}

/// Literal punctuation tallies plus the aggregate count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PunctuationTally {
    pub period: usize,
    pub question: usize,
    pub exclamation: usize,
    pub comma: usize,
    pub semicolon: usize,
    /// Aggregate from [`LanguageProfile::punctuation_total`], not the sum of
    /// the fields above.
    pub total: usize,
}

pub fn punctuation_tally(
    doc: &TaggedDocument,
    profile: &dyn LanguageProfile,
    revision: StatsRevision,
) -> PunctuationTally {
    let marks = profile.sentence_marks();
    let mut tally = PunctuationTally::default();
    for token in doc.tokens() {
        let token = token.as_str();
        if token == marks.period {
            tally.period += 1;
        } else if token == marks.question {
            tally.question += 1;
        } else if token == marks.exclamation {
            tally.exclamation += 1;
        } else if token == marks.comma {
            tally.comma += 1;
        } else if token == marks.semicolon {
            tally.semicolon += 1;
        }
    }
    tally.total = profile.punctuation_total(doc, revision);
    tally
}

/// Number of tokens whose tag falls in each word class.
pub fn class_counts(doc: &TaggedDocument, table: &TagClassTable) -> HashMap<WordClass, usize> {
    let mut tag_counts: HashMap<&str, usize> = HashMap::new();
    for t in doc.tags() {
        *tag_counts.entry(t.as_str()).or_insert(0) += 1;
    }
    WordClass::ALL
        .iter()
        .map(|&class| {
            let n = table
                .tags(class)
                .iter()
                .map(|t| tag_counts.get(t).copied().unwrap_or(0))
                .sum();
            (class, n)
        })
        .collect()
}

/// Word-class shares of a document's word count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ClassProportions {
    pub content: f64,
    pub function: f64,
    pub noun: f64,
    pub pronoun: f64,
    pub verb: f64,
    pub adjective: f64,
    pub adverb: f64,
    pub conjunction: f64,
    pub auxiliary: f64,
}

impl ClassProportions {
    fn from_counts(counts: &HashMap<WordClass, usize>, denominator: usize) -> Self {
        let share = |class| counts.get(&class).copied().unwrap_or(0) as f64 / denominator as f64;
        ClassProportions {
            content: share(WordClass::Content),
            function: share(WordClass::Function),
            noun: share(WordClass::Noun),
            pronoun: share(WordClass::Pronoun),
            verb: share(WordClass::Verb),
            adjective: share(WordClass::Adjective),
            adverb: share(WordClass::Adverb),
            conjunction: share(WordClass::Conjunction),
            auxiliary: share(WordClass::Auxiliary),
        }
    }

    pub fn get(&self, class: WordClass) -> f64 {
        match class {
            WordClass::Content => self.content,
            WordClass::Function => self.function,
            WordClass::Noun => self.noun,
            WordClass::Pronoun => self.pronoun,
            WordClass::Verb => self.verb,
            WordClass::Adjective => self.adjective,
            WordClass::Adverb => self.adverb,
            WordClass::Conjunction => self.conjunction,
            WordClass::Auxiliary => self.auxiliary,
        }
    }
}

/// One row of the lexical table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LexicalStats {
    pub docname: String,
    pub tokens: usize,
    pub types: usize,
    pub ttr: f64,
    pub sttr: f64,
    pub words: usize,
    pub mwl: f64,
    pub classes: ClassProportions,
}

impl LexicalStats {
    /// Lexical table; the fifth column is `STTR` or `words` depending on `revision`.
    pub fn table(rows: &[LexicalStats], revision: StatsRevision) -> Table {
        let fifth = match revision {
            StatsRevision::Original => "STTR",
            StatsRevision::Revised => "words",
        };
        let mut columns = vec!["docname", "tokens", "types", "TTR", fifth, "MWL"];
        columns.extend(WordClass::ALL.iter().map(WordClass::name));
        let mut table = Table::new(columns);
        for r in rows {
            let mut row = vec![
                Cell::from(r.docname.as_str()),
                Cell::from(r.tokens),
                Cell::from(r.types),
                Cell::from(r.ttr),
                match revision {
                    StatsRevision::Original => Cell::from(r.sttr),
                    StatsRevision::Revised => Cell::from(r.words),
                },
                Cell::from(r.mwl),
            ];
            row.extend(WordClass::ALL.iter().map(|&c| Cell::from(r.classes.get(c))));
            table.push_row(row);
        }
        table
    }
}

/// Lexical statistics of one tagged document.
pub fn lexical_stats(
    name: &str,
    doc: &TaggedDocument,
    profile: &dyn LanguageProfile,
    opts: &StatsOptions,
) -> Result<LexicalStats> {
    let classes = profile.tag_classes();
    let words: Vec<&str> = doc
        .pairs()
        .filter(|(_, t)| classes.is_word_tag(t))
        .map(|(w, _)| w)
        .collect();
    let counts = class_counts(doc, classes);
    let sttr_value = sttr(&words, opts.sttr);

    let (tokens, types, word_count) = match opts.revision {
        StatsRevision::Original => {
            let types: HashSet<&str> = words.iter().copied().collect();
            (words.len(), types.len(), words.len())
        }
        StatsRevision::Revised => {
            let types: HashSet<&str> = doc.tokens().iter().map(String::as_str).collect();
            let punct = profile.punctuation_total(doc, opts.revision);
            (doc.len(), types.len(), doc.len().saturating_sub(punct))
        }
    };
    if tokens == 0 {
        return Err(Error::zero(name, "tokens"));
    }
    if word_count == 0 {
        return Err(Error::zero(name, "words"));
    }
    let mwl = mean_word_length(name, doc, profile, opts.revision)?;

    Ok(LexicalStats {
        docname: name.to_string(),
        tokens,
        types,
        ttr: types as f64 / tokens as f64,
        sttr: sttr_value,
        words: word_count,
        mwl,
        classes: ClassProportions::from_counts(&counts, word_count),
    })
}

/// Lexical statistics for every document of the corpus.
pub fn lexical_table(
    corpus: &Corpus,
    profile: &dyn LanguageProfile,
    opts: &StatsOptions,
) -> Result<StatsReport<LexicalStats>> {
    info!("lexical statistics for {} documents", corpus.len());
    per_document(corpus, opts, |d| {
        let doc = tag(&d.text, profile);
        debug!("{}: {} tokens", d.name, doc.len());
        lexical_stats(&d.name, &doc, profile, opts)
    })
}

/// One row of the sentence table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentenceStats {
    pub docname: String,
    pub sentences: usize,
    pub statement: f64,
    pub interrogative: f64,
    pub exclamatory: f64,
    pub msl: f64,
    pub punctuation: usize,
    pub period: f64,
    pub question: f64,
    pub exclamation: f64,
    pub comma: f64,
    pub semicolon: f64,
}

impl SentenceStats {
    pub const COLUMNS: [&'static str; 12] = [
        "docname",
        "sentences",
        "statement",
        "interrogative",
        "exclamatory",
        "MSL",
        "punctuation",
        "period",
        "question",
        "exclamation",
        "comma",
        "semicolon",
    ];

    pub fn table(rows: &[SentenceStats]) -> Table {
        let mut table = Table::new(Self::COLUMNS);
        for r in rows {
            table.push_row(vec![
                Cell::from(r.docname.as_str()),
                Cell::from(r.sentences),
                Cell::from(r.statement),
                Cell::from(r.interrogative),
                Cell::from(r.exclamatory),
                Cell::from(r.msl),
                Cell::from(r.punctuation),
                Cell::from(r.period),
                Cell::from(r.question),
                Cell::from(r.exclamation),
                Cell::from(r.comma),
                Cell::from(r.semicolon),
            ]);
        }
        table
    }
}

/// Sentence statistics of one raw document.
pub fn sentence_stats(
    name: &str,
    text: &str,
    profile: &dyn LanguageProfile,
    opts: &StatsOptions,
) -> Result<SentenceStats> {
    let sentences = profile.segment(text);
    if sentences.is_empty() {
        return Err(Error::zero(name, "sentences"));
    }
    let n = sentences.len() as f64;
    let tally = punctuation_tally(&tag(text, profile), profile, opts.revision);
    let sentence_tokens: usize = sentences.iter().map(|s| tag(s, profile).len()).sum();
    if tally.total == 0 {
        return Err(Error::zero(name, "punctuation"));
    }
    let total = tally.total as f64;

    Ok(SentenceStats {
        docname: name.to_string(),
        sentences: sentences.len(),
        statement: tally.period as f64 / n,
        interrogative: tally.question as f64 / n,
        exclamatory: tally.exclamation as f64 / n,
        msl: sentence_tokens as f64 / n,
        punctuation: tally.total,
        period: tally.period as f64 / total,
        question: tally.question as f64 / total,
        exclamation: tally.exclamation as f64 / total,
        comma: tally.comma as f64 / total,
        semicolon: tally.semicolon as f64 / total,
    })
}

/// Sentence statistics for every document of the corpus.
pub fn sentence_table(
    corpus: &Corpus,
    profile: &dyn LanguageProfile,
    opts: &StatsOptions,
) -> Result<StatsReport<SentenceStats>> {
    info!("sentence statistics for {} documents", corpus.len());
    per_document(corpus, opts, |d| sentence_stats(&d.name, &d.text, profile, opts))
}

/// Clause-length histogram: for each length, the number of clauses per document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClauseLengths {
    pub lengths: Vec<usize>,
    /// `(document, counts)` with `counts[i]` belonging to `lengths[i]`.
    pub documents: Vec<(String, Vec<usize>)>,
}

impl ClauseLengths {
    pub fn table(&self) -> Table {
        let mut columns = vec!["length".to_string()];
        columns.extend(self.documents.iter().map(|(name, _)| name.clone()));
        let mut table = Table::new(columns);
        for (i, len) in self.lengths.iter().enumerate() {
            let mut row = vec![Cell::from(*len)];
            row.extend(self.documents.iter().map(|(_, c)| Cell::from(c[i])));
            table.push_row(row);
        }
        table
    }
}

/// Count clauses by word length (tokens minus punctuation) for lengths in
/// `start..end`. Only Chinese clause rules exist.
pub fn clause_lengths(
    corpus: &Corpus,
    profile: &dyn LanguageProfile,
    start: usize,
    end: usize,
    revision: StatsRevision,
) -> Result<ClauseLengths> {
    if profile.code() != "zh" {
        return Err(Error::UnsupportedLanguage(profile.code().to_string()));
    }
    let lengths: Vec<usize> = (start..end).collect();
    let documents = corpus
        .documents()
        .par_iter()
        .map(|d| {
            let mut counts = vec![0usize; lengths.len()];
            for clause in split_chinese_clauses(&d.text) {
                let doc = tag(&clause, profile);
                let total = profile.punctuation_total(&doc, revision);
                let words = doc.len().saturating_sub(total);
                if (start..end).contains(&words) {
                    counts[words - start] += 1;
                }
            }
            (d.name.clone(), counts)
        })
        .collect();
    Ok(ClauseLengths { lengths, documents })
}

fn per_document<T, F>(corpus: &Corpus, opts: &StatsOptions, f: F) -> Result<StatsReport<T>>
where
    T: Send,
    F: Fn(&Document) -> Result<T> + Sync,
{
    let results: Vec<(String, Result<T>)> = corpus
        .documents()
        .par_iter()
        .map(|d| (d.name.clone(), f(d)))
        .collect();

    let mut report = StatsReport::default();
    for (name, result) in results {
        match result {
            Ok(row) => report.rows.push(row),
            Err(e) if opts.isolate_failures => {
                warn!("skipping {}: {}", name, e);
                report.failed.push((name, e.to_string()));
            }
            Err(e) => return Err(e),
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::{ChineseProfile, EnglishProfile};

    fn doc(pairs: &[(&str, &str)]) -> TaggedDocument {
        TaggedDocument::from_pairs(
            pairs
                .iter()
                .map(|(w, t)| (w.to_string(), t.to_string())),
        )
    }

    fn words(n_distinct: usize, total: usize) -> Vec<String> {
        (0..total).map(|i| format!("w{}", i % n_distinct)).collect()
    }

    #[test]
    fn ttr_bounds() {
        assert_eq!(ttr(&["a", "b", "c"]), Some(1.0));
        assert_eq!(ttr(&["a", "a", "b", "b"]), Some(0.5));
        assert_eq!(ttr::<&str>(&[]), None);
    }

    #[test]
    fn sttr_short_document_is_zero() {
        assert_eq!(sttr(&words(10, 999), SttrPolicy::Padded), 0.0);
        assert_eq!(sttr::<String>(&[], SttrPolicy::Padded), 0.0);
    }

    #[test]
    fn sttr_pads_trailing_chunk_with_zero() {
        // two full chunks with TTR 0.5, one short chunk
        let w = words(500, 2500);
        assert!((sttr(&w, SttrPolicy::Padded) - 1.0 / 3.0).abs() < 1e-12);
        assert!((sttr(&w, SttrPolicy::Corrected) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn sttr_exact_multiple_has_no_padding() {
        let w = words(250, 2000);
        assert!((sttr(&w, SttrPolicy::Padded) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn sttr_corrected_falls_back_to_ttr() {
        let w = words(5, 10);
        assert_eq!(sttr(&w, SttrPolicy::Corrected), 0.5);
    }

    #[test]
    fn original_revision_counts_content_and_function_words() {
        let d = doc(&[
            ("The", "DT"),
            ("dog", "NN"),
            ("saw", "VBD"),
            ("the", "DT"),
            ("dog", "NN"),
            (".", "."),
        ]);
        let s = lexical_stats("d.txt", &d, &EnglishProfile, &StatsOptions::default()).unwrap();
        assert_eq!(s.tokens, 5);
        assert_eq!(s.types, 4);
        assert!((s.ttr - 0.8).abs() < 1e-12);
        assert_eq!(s.sttr, 0.0);
        // (3 + 3 + 3 + 3 + 3) / 5
        assert!((s.mwl - 3.0).abs() < 1e-12);
        assert!((s.classes.noun - 0.4).abs() < 1e-12);
        assert!((s.classes.content - 0.6).abs() < 1e-12);
        assert!((s.classes.function - 0.4).abs() < 1e-12);
        assert!(s.classes.content + s.classes.function + s.classes.noun > 1.0);
    }

    #[test]
    fn revised_revision_counts_all_tokens() {
        let d = doc(&[("好", "a"), ("，", "x"), ("好", "a"), ("。", "x")]);
        let opts = StatsOptions {
            revision: StatsRevision::Revised,
            ..Default::default()
        };
        let s = lexical_stats("z.txt", &d, &ChineseProfile, &opts).unwrap();
        assert_eq!(s.tokens, 4);
        assert_eq!(s.types, 3);
        assert_eq!(s.words, 2);
        assert!((s.mwl - 1.0).abs() < 1e-12);
        assert!((s.classes.adjective - 1.0).abs() < 1e-12);
    }

    #[test]
    fn original_mwl_uses_symbol_token_list_for_chinese() {
        // "#" is not in the fine-grained list, so it counts as a word here
        let d = doc(&[("中国", "ns"), ("#", "x"), ("。", "x")]);
        let m = mean_word_length("z", &d, &ChineseProfile, StatsRevision::Original).unwrap();
        assert!((m - 1.5).abs() < 1e-12);
        let m = mean_word_length("z", &d, &ChineseProfile, StatsRevision::Revised).unwrap();
        assert!((m - 2.0).abs() < 1e-12);
    }

    #[test]
    fn empty_document_is_division_by_zero() {
        let err = lexical_stats("e.txt", &TaggedDocument::default(), &EnglishProfile, &StatsOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::DivisionByZero { ref document, .. } if document == "e.txt"));
    }

    #[test]
    fn punctuation_tally_is_token_based_total_is_tag_based() {
        let d = doc(&[
            ("Hi", "UH"),
            (",", ","),
            ("you", "PRP"),
            ("!", "."),
            ("(", "("),
            (";", ":"),
        ]);
        let t = punctuation_tally(&d, &EnglishProfile, StatsRevision::Original);
        assert_eq!(t.comma, 1);
        assert_eq!(t.exclamation, 1);
        assert_eq!(t.semicolon, 1);
        assert_eq!(t.period, 0);
        assert_eq!(t.total, 4);
    }

    #[test]
    fn sentence_stats_english() {
        let text = "The dog barks. Does it bite? It does, sometimes.";
        let s = sentence_stats("s.txt", text, &EnglishProfile, &StatsOptions::default()).unwrap();
        assert_eq!(s.sentences, 3);
        assert!((s.statement - 2.0 / 3.0).abs() < 1e-12);
        assert!((s.interrogative - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(s.exclamatory, 0.0);
        // 4 + 4 + 5 tokens
        assert!((s.msl - 13.0 / 3.0).abs() < 1e-12);
        assert_eq!(s.punctuation, 4);
        assert!((s.period - 0.5).abs() < 1e-12);
        assert!((s.comma - 0.25).abs() < 1e-12);
    }

    #[test]
    fn sentence_stats_without_punctuation_fails() {
        let err = sentence_stats("n.txt", "no punctuation here", &EnglishProfile, &StatsOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::DivisionByZero { quantity: "punctuation", .. }));
        let err = sentence_stats("e.txt", "   ", &EnglishProfile, &StatsOptions::default()).unwrap_err();
        assert!(matches!(err, Error::DivisionByZero { quantity: "sentences", .. }));
    }

    #[test]
    fn isolate_failures_collects_errors() {
        let corpus: Corpus = [("a.txt", "The cat sleeps."), ("b.txt", "")].into_iter().collect();
        let strict = lexical_table(&corpus, &EnglishProfile, &StatsOptions::default());
        assert!(strict.is_err());

        let opts = StatsOptions {
            isolate_failures: true,
            ..Default::default()
        };
        let report = lexical_table(&corpus, &EnglishProfile, &opts).unwrap();
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].docname, "a.txt");
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "b.txt");
    }

    #[test]
    fn lexical_table_columns_follow_revision() {
        let corpus: Corpus = [("a.txt", "The cat sleeps.")].into_iter().collect();
        let report = lexical_table(&corpus, &EnglishProfile, &StatsOptions::default()).unwrap();
        let t = LexicalStats::table(&report.rows, StatsRevision::Original);
        assert_eq!(t.columns[4], "STTR");
        assert_eq!(t.columns.len(), 15);
        let t = LexicalStats::table(&report.rows, StatsRevision::Revised);
        assert_eq!(t.columns[4], "words");
        assert_eq!(t.columns[14], "auxiliary");
    }

    #[test]
    fn clause_lengths_only_for_chinese() {
        let corpus: Corpus = [("a.txt", "text")].into_iter().collect();
        assert!(matches!(
            clause_lengths(&corpus, &EnglishProfile, 0, 5, StatsRevision::Original),
            Err(Error::UnsupportedLanguage(_))
        ));
    }

    #[test]
    fn clause_lengths_count_empty_clauses_as_zero() {
        let corpus: Corpus = [("a.txt", "\n\n")].into_iter().collect();
        let out = clause_lengths(&corpus, &ChineseProfile, 0, 3, StatsRevision::Revised).unwrap();
        assert_eq!(out.lengths, vec![0, 1, 2]);
        assert_eq!(out.documents[0].1, vec![3, 0, 0]);
        assert_eq!(out.table().columns, vec!["length", "a.txt"]);
    }
}
