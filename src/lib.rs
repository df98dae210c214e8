#![forbid(unsafe_code)]
//! # corpus_analysis
//!
//! Corpus-linguistics toolkit for Chinese and English plain-text corpora.
//!
//! ## Features
//! - Load a directory of `.txt` documents and apply substitution preprocessing.
//! - Tokenize and part-of-speech tag text (`jieba-rs` for Chinese, a
//!   rule-based Penn-style tagger for English).
//! - Sentence and clause segmentation.
//! - Lexical statistics: TTR, STTR, mean word length, word-class proportions,
//!   sentence and punctuation statistics, clause-length distribution.
//! - KWIC concordance with literal, phrase and regex matching.
//! - Word frequency ranking with stopwords, keyword distribution over tiles.
//! - Alignment classification of parallel source/target tables.
//! - Export of every result table to TXT, CSV, TSV or JSON.
//!
//! ## Example
//! ```
//! use corpus_analysis::{Corpus, KwicOptions, Language, kwic};
//!
//! let corpus: Corpus = [("a.txt", "The cat sat on the mat. The cat slept.")]
//!     .into_iter()
//!     .collect();
//! let hits = kwic(&corpus, "cat", Language::English.profile(), &KwicOptions::default()).unwrap();
//! assert_eq!(hits.len(), 2);
//! assert_eq!(hits[0].right_text(), "sat on the mat");
//! ```

pub mod alignment;
pub mod corpus;
pub mod error;
pub mod export;
pub mod frequency;
pub mod kwic;
pub mod language;
pub mod lexical;
pub mod segment;
pub mod tagging;

pub use alignment::{
    AlignmentRecord, AlignmentRow, AlignmentSummary, AlignmentType, classify,
    read_parallel_table, summarize,
};
pub use corpus::{Corpus, Document, Stopwords, load_dir, preprocess};
pub use error::{Error, Result};
pub use export::{
    Cell, ExportFormat, Table, csv_safe_cell, export_file_name, export_highlighted,
    export_table,
};
pub use frequency::{
    CorpusDistribution, Distribution, FrequencyList, corpus_distribution, corpus_frequency,
    count_words, distribution, rank_frequency, tile_boundaries, tile_labels,
};
pub use kwic::{ConcordanceHit, Keyword, KwicMode, KwicOptions, kwic, kwic_document};
pub use language::{Language, LanguageProfile, WordClass, profile_for};
pub use lexical::{
    ClauseLengths, LexicalStats, SentenceStats, StatsOptions, StatsReport, StatsRevision,
    SttrPolicy, clause_lengths, lexical_table, sentence_table, sttr, ttr,
};
pub use segment::{segment, split_chinese_clauses, split_chinese_sentences, split_english_sentences};
pub use tagging::{TaggedDocument, tag, tag_with_code};

/// Print documents that could not be processed, one per line, to stderr.
pub fn print_failed_files(failed: &[(String, String)]) {
    eprintln!("\nSkipped {} document(s):", failed.len());
    for (name, reason) in failed {
        eprintln!("  {name}: {reason}");
    }
}
