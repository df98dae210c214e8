//! Word frequency ranking and keyword distribution over tiles.

use std::collections::HashMap;

use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;

use crate::corpus::{Corpus, Stopwords};
use crate::error::{Error, Result};
use crate::export::{Cell, Table};
use crate::language::LanguageProfile;
use crate::tagging::tag;

/// Tile counts [`distribution`] accepts.
pub const VALID_TILES: [usize; 4] = [1, 2, 5, 10];

/// Count words, keeping the order in which each word first occurs.
/// # Example
/// ```
/// use corpus_analysis::count_words;
/// let words = ["b", "a", "b", "c", "a", "b"];
/// let counts = count_words(&words);
/// let expected = vec![("b".to_string(), 3), ("a".to_string(), 2), ("c".to_string(), 1)];
/// assert_eq!(counts, expected);
/// ```
pub fn count_words<S: AsRef<str>>(words: &[S]) -> Vec<(String, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();
    for word in words {
        let word = word.as_ref();
        match index.get(word) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(word, counts.len());
                counts.push((word.to_string(), 1));
            }
        }
    }
    counts
}

/// Rank non-stopword tokens by descending frequency and keep ranks `[start, end)`.
///
/// Ties keep first-occurrence order. Bounds past the end are clamped.
pub fn rank_frequency<S: AsRef<str>>(
    tokens: &[S],
    stopwords: &Stopwords,
    start: usize,
    end: usize,
) -> Vec<(String, usize)> {
    let kept: Vec<&str> = tokens
        .iter()
        .map(AsRef::as_ref)
        .filter(|t| !stopwords.contains(t))
        .collect();
    let mut ranked = count_words(&kept);
    // stable: equal counts stay in first-occurrence order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let end = end.min(ranked.len());
    let start = start.min(end);
    ranked.drain(start..end).collect()
}

/// Ranked words of one document, or of the whole corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyList {
    pub document: String,
    pub words: Vec<(String, usize)>,
}

impl FrequencyList {
    pub const COLUMNS: [&'static str; 2] = ["word", "frequency"];

    /// `word, frequency` for this list alone.
    pub fn table(&self) -> Table {
        let mut table = Table::new(Self::COLUMNS);
        for (word, n) in &self.words {
            table.push_row(vec![Cell::from(word.as_str()), Cell::from(*n)]);
        }
        table
    }

    /// `docname, word, frequency` over several lists.
    pub fn combined_table(lists: &[FrequencyList]) -> Table {
        let mut table = Table::new(["docname", "word", "frequency"]);
        for list in lists {
            for (word, n) in &list.words {
                table.push_row(vec![
                    Cell::from(list.document.as_str()),
                    Cell::from(word.as_str()),
                    Cell::from(*n),
                ]);
            }
        }
        table
    }
}

/// Name of the list produced by [`corpus_frequency`] with `combine` set.
pub const COMBINED_NAME: &str = "corpus";

/// Frequency ranking per document, or one ranking over the tokens of every
/// document when `combine` is set.
pub fn corpus_frequency(
    corpus: &Corpus,
    profile: &dyn LanguageProfile,
    stopwords: &Stopwords,
    start: usize,
    end: usize,
    combine: bool,
) -> Vec<FrequencyList> {
    let tokenized: Vec<(String, Vec<String>)> = corpus
        .documents()
        .par_iter()
        .map(|d| (d.name.clone(), tag(&d.text, profile).tokens().to_vec()))
        .collect();
    info!(
        "ranking words of {} documents{}",
        tokenized.len(),
        if combine { " (combined)" } else { "" }
    );

    if combine {
        let all: Vec<&String> = tokenized.iter().flat_map(|(_, t)| t).collect();
        return vec![FrequencyList {
            document: COMBINED_NAME.to_string(),
            words: rank_frequency(&all, stopwords, start, end),
        }];
    }
    tokenized
        .into_iter()
        .map(|(document, tokens)| FrequencyList {
            words: rank_frequency(&tokens, stopwords, start, end),
            document,
        })
        .collect()
}

fn tile_step(tiles: usize) -> Result<usize> {
    if VALID_TILES.contains(&tiles) {
        Ok(10 / tiles)
    } else {
        Err(Error::InvalidTile(tiles))
    }
}

/// Exclusive end index of each tile of a sequence of `len` tokens.
///
/// Boundary `k` is `len * k / tiles` rounded half up, so the last one is `len`.
pub fn tile_boundaries(len: usize, tiles: usize) -> Result<Vec<usize>> {
    let step = tile_step(tiles)?;
    Ok((0..10)
        .step_by(step)
        .map(|i| (len * (i + step) + 5) / 10)
        .collect())
}

/// `"10%"`, `"20%"`, ... labels for `tiles` tiles.
pub fn tile_labels(tiles: usize) -> Result<Vec<String>> {
    let step = tile_step(tiles)?;
    Ok((0..10)
        .step_by(step)
        .map(|i| format!("{}%", 10 * (i + step)))
        .collect())
}

/// Keyword occurrences per tile of one token sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Distribution {
    pub labels: Vec<String>,
    pub counts: Vec<usize>,
}

/// Count exact occurrences of `keyword` in each tile of `tokens`.
pub fn distribution<S: AsRef<str>>(tokens: &[S], keyword: &str, tiles: usize) -> Result<Distribution> {
    let labels = tile_labels(tiles)?;
    let mut start = 0;
    let counts = tile_boundaries(tokens.len(), tiles)?
        .into_iter()
        .map(|end| {
            let n = tokens[start..end]
                .iter()
                .filter(|t| t.as_ref() == keyword)
                .count();
            start = end;
            n
        })
        .collect();
    Ok(Distribution { labels, counts })
}

/// Keyword distribution of every document of a corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorpusDistribution {
    pub keyword: String,
    pub labels: Vec<String>,
    pub documents: Vec<(String, Vec<usize>)>,
}

impl CorpusDistribution {
    /// `docname` followed by one column per tile label.
    pub fn table(&self) -> Table {
        let mut columns = vec!["docname".to_string()];
        columns.extend(self.labels.iter().cloned());
        let mut table = Table::new(columns);
        for (name, counts) in &self.documents {
            let mut row = vec![Cell::from(name.as_str())];
            row.extend(counts.iter().map(|&n| Cell::from(n)));
            table.push_row(row);
        }
        table
    }
}

pub fn corpus_distribution(
    corpus: &Corpus,
    keyword: &str,
    profile: &dyn LanguageProfile,
    tiles: usize,
) -> Result<CorpusDistribution> {
    let labels = tile_labels(tiles)?;
    let documents = corpus
        .documents()
        .par_iter()
        .map(|d| {
            let doc = tag(&d.text, profile);
            let dist = distribution(doc.tokens(), keyword, tiles)?;
            debug!("{}: {:?}", d.name, dist.counts);
            Ok((d.name.clone(), dist.counts))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(CorpusDistribution {
        keyword: keyword.to_string(),
        labels,
        documents,
    })
}
