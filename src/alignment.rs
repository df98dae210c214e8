//! Classification of aligned source/target rows of a parallel corpus.
//!
//! A row's type is inferred only from how its target sentences overlap with
//! the targets of the neighbouring rows.

use std::fmt;
use std::path::Path;

use csv::ReaderBuilder;
use log::{debug, info};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::export::{Cell, Table};
use crate::language::LanguageProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AlignmentType {
    #[serde(rename = "one to one")]
    OneToOne,
    #[serde(rename = "one to many")]
    OneToMany,
    #[serde(rename = "many to one")]
    ManyToOne,
    #[serde(rename = "many to many")]
    ManyToMany,
}

impl AlignmentType {
    pub const ALL: [AlignmentType; 4] = [
        AlignmentType::OneToOne,
        AlignmentType::OneToMany,
        AlignmentType::ManyToOne,
        AlignmentType::ManyToMany,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AlignmentType::OneToOne => "one to one",
            AlignmentType::OneToMany => "one to many",
            AlignmentType::ManyToOne => "many to one",
            AlignmentType::ManyToMany => "many to many",
        }
    }
}

impl fmt::Display for AlignmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One aligned pair as read from the parallel table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlignmentRow {
    pub source: String,
    pub target: String,
}

impl AlignmentRow {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        AlignmentRow {
            source: source.into(),
            target: target.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlignmentRecord {
    #[serde(rename = "type")]
    pub kind: AlignmentType,
    pub source: String,
    pub target: String,
}

impl AlignmentRecord {
    pub const COLUMNS: [&'static str; 3] = ["type", "source text", "target text"];

    pub fn table(records: &[AlignmentRecord]) -> Table {
        let mut table = Table::new(Self::COLUMNS);
        for r in records {
            table.push_row(vec![
                Cell::from(r.kind.name()),
                Cell::from(r.source.as_str()),
                Cell::from(r.target.as_str()),
            ]);
        }
        table
    }
}

/// Read `source_col` and `target_col` of a delimited file with a header row.
pub fn read_parallel_table<P: AsRef<Path>>(
    path: P,
    source_col: &str,
    target_col: &str,
    delimiter: u8,
) -> Result<Vec<AlignmentRow>> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)?;

    let headers = rdr.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    };
    let source_idx = column(source_col)?;
    let target_idx = column(target_col)?;

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let field = |i: usize| record.get(i).unwrap_or("").to_string();
        rows.push(AlignmentRow {
            source: field(source_idx),
            target: field(target_idx),
        });
    }
    info!("read {} aligned rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Classify every row against its neighbours.
///
/// The first row is compared with its successor only, the last with its
/// predecessor only, and a single row has no neighbour at all.
pub fn classify(rows: &[AlignmentRow], profile: &dyn LanguageProfile) -> Vec<AlignmentRecord> {
    let sentences: Vec<Vec<String>> = rows
        .iter()
        .map(|r| profile.segment(trim_spaces(&r.target)))
        .collect();
    let last = rows.len().saturating_sub(1);

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let hic = &sentences[i];
            let (pre, post) = match i {
                _ if rows.len() == 1 => (None, None),
                0 => (None, Some(i + 1)),
                _ if i == last => (Some(i - 1), None),
                _ => (Some(i - 1), Some(i + 1)),
            };
            let kind = match (pre, post) {
                (Some(p), Some(n)) => interior(rows, &sentences, hic, i, p, n),
                (p, n) => edge(rows, &sentences, hic, i, p.or(n)),
            };
            debug!("row {}: {}", i, kind);
            AlignmentRecord {
                kind,
                source: row.source.clone(),
                target: row.target.clone(),
            }
        })
        .collect()
}

fn trim_spaces(s: &str) -> &str {
    s.trim_end_matches(' ')
}

fn contains(sentences: &[String], s: &str) -> bool {
    sentences.iter().any(|x| x == s)
}

fn edge(
    rows: &[AlignmentRow],
    sentences: &[Vec<String>],
    hic: &[String],
    i: usize,
    neighbour: Option<usize>,
) -> AlignmentType {
    let empty = Vec::new();
    let reference = neighbour.map_or(&empty, |j| &sentences[j]);
    if hic.len() > 1 {
        if !contains(reference, &hic[0]) && !contains(reference, &hic[hic.len() - 1]) {
            AlignmentType::OneToMany
        } else {
            AlignmentType::ManyToMany
        }
    } else if !contains(reference, trim_spaces(&rows[i].target)) {
        AlignmentType::OneToOne
    } else if neighbour.is_some_and(|j| rows[i].target == rows[j].target) {
        AlignmentType::ManyToOne
    } else {
        AlignmentType::ManyToMany
    }
}

fn interior(
    rows: &[AlignmentRow],
    sentences: &[Vec<String>],
    hic: &[String],
    i: usize,
    pre: usize,
    post: usize,
) -> AlignmentType {
    let (before, after) = (&sentences[pre], &sentences[post]);
    if hic.len() > 1 {
        if !contains(before, &hic[0]) && !contains(after, &hic[hic.len() - 1]) {
            AlignmentType::OneToMany
        } else {
            AlignmentType::ManyToMany
        }
    } else {
        let target = trim_spaces(&rows[i].target);
        if !contains(before, target) && !contains(after, target) {
            AlignmentType::OneToOne
        } else if rows[i].target == rows[pre].target || rows[i].target == rows[post].target {
            AlignmentType::ManyToOne
        } else {
            AlignmentType::ManyToMany
        }
    }
}

/// Share of each alignment type among all rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlignmentSummary {
    pub alignments: usize,
    pub one_to_one: f64,
    pub one_to_many: f64,
    pub many_to_one: f64,
    pub many_to_many: f64,
}

impl AlignmentSummary {
    pub const COLUMNS: [&'static str; 5] = [
        "alignments",
        "one to one",
        "one to many",
        "many to one",
        "many to many",
    ];

    pub fn get(&self, kind: AlignmentType) -> f64 {
        match kind {
            AlignmentType::OneToOne => self.one_to_one,
            AlignmentType::OneToMany => self.one_to_many,
            AlignmentType::ManyToOne => self.many_to_one,
            AlignmentType::ManyToMany => self.many_to_many,
        }
    }

    pub fn table(&self) -> Table {
        let mut table = Table::new(Self::COLUMNS);
        let mut row = vec![Cell::from(self.alignments)];
        row.extend(AlignmentType::ALL.iter().map(|&k| Cell::from(self.get(k))));
        table.push_row(row);
        table
    }
}

pub fn summarize(records: &[AlignmentRecord]) -> Result<AlignmentSummary> {
    if records.is_empty() {
        return Err(Error::zero("alignment table", "rows"));
    }
    let total = records.len() as f64;
    let share = |kind: AlignmentType| {
        records.iter().filter(|r| r.kind == kind).count() as f64 / total
    };
    Ok(AlignmentSummary {
        alignments: records.len(),
        one_to_one: share(AlignmentType::OneToOne),
        one_to_many: share(AlignmentType::OneToMany),
        many_to_one: share(AlignmentType::ManyToOne),
        many_to_many: share(AlignmentType::ManyToMany),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::{ChineseProfile, EnglishProfile};
    use std::fs;
    use tempfile::tempdir;

    fn kinds(records: &[AlignmentRecord]) -> Vec<AlignmentType> {
        records.iter().map(|r| r.kind).collect()
    }

    #[test]
    fn multi_sentence_target_absent_from_neighbours_is_one_to_many() {
        let rows = vec![
            AlignmentRow::new("Hallo.", "Hello there."),
            AlignmentRow::new("Erster Teil und zweiter Teil.", "First part. Second part."),
            AlignmentRow::new("Tschüss.", "Bye now."),
        ];
        let records = classify(&rows, &EnglishProfile);
        use AlignmentType::*;
        assert_eq!(kinds(&records), vec![OneToOne, OneToMany, OneToOne]);
        assert_eq!(records[1].source, "Erster Teil und zweiter Teil.");
    }

    #[test]
    fn repeated_target_is_many_to_one() {
        let rows = vec![
            AlignmentRow::new("他来了。", "He came."),
            AlignmentRow::new("他到了。", "He came."),
            AlignmentRow::new("好。", "Good."),
        ];
        let records = classify(&rows, &EnglishProfile);
        use AlignmentType::*;
        assert_eq!(kinds(&records), vec![ManyToOne, ManyToOne, OneToOne]);
    }

    #[test]
    fn shared_sentence_with_neighbour_is_many_to_many() {
        let rows = vec![
            AlignmentRow::new("a", "我来了。你好。"),
            AlignmentRow::new("b", "你好。"),
            AlignmentRow::new("c", "再见。"),
        ];
        let records = classify(&rows, &ChineseProfile);
        use AlignmentType::*;
        // row 0 shares its last sentence with row 1; row 1 is found in row 0
        assert_eq!(kinds(&records), vec![ManyToMany, ManyToMany, OneToOne]);
    }

    #[test]
    fn single_row_has_no_neighbour() {
        let one = classify(&[AlignmentRow::new("s", "Only one.")], &EnglishProfile);
        assert_eq!(kinds(&one), vec![AlignmentType::OneToOne]);
        let many = classify(&[AlignmentRow::new("s", "One. Two.")], &EnglishProfile);
        assert_eq!(kinds(&many), vec![AlignmentType::OneToMany]);
        assert!(classify(&[], &EnglishProfile).is_empty());
    }

    #[test]
    fn summary_proportions_sum_to_one() {
        let rows = vec![
            AlignmentRow::new("1", "A."),
            AlignmentRow::new("2", "Bee. Sea."),
            AlignmentRow::new("3", "D."),
            AlignmentRow::new("4", "D."),
        ];
        let records = classify(&rows, &EnglishProfile);
        let summary = summarize(&records).unwrap();
        assert_eq!(summary.alignments, 4);
        let total: f64 = AlignmentType::ALL.iter().map(|&k| summary.get(k)).sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert_eq!(summary.many_to_one, 0.5);
        assert_eq!(summary.table().columns, AlignmentSummary::COLUMNS);
    }

    #[test]
    fn empty_summary_is_division_by_zero() {
        assert!(matches!(
            summarize(&[]),
            Err(Error::DivisionByZero { .. })
        ));
    }

    #[test]
    fn reads_columns_by_name() {
        let td = tempdir().unwrap();
        let path = td.path().join("pairs.tsv");
        fs::write(&path, "id\tsrc\ttgt\n1\t你好。\tHello.\n2\t再见。\tBye.\n").unwrap();
        let rows = read_parallel_table(&path, "src", "tgt", b'\t').unwrap();
        assert_eq!(rows, vec![
            AlignmentRow::new("你好。", "Hello."),
            AlignmentRow::new("再见。", "Bye."),
        ]);

        let err = read_parallel_table(&path, "src", "target", b'\t').unwrap_err();
        assert!(matches!(err, Error::MissingColumn(ref c) if c == "target"));
    }

    #[test]
    fn record_table_uses_type_names() {
        let records = vec![AlignmentRecord {
            kind: AlignmentType::OneToMany,
            source: "s".into(),
            target: "t".into(),
        }];
        let table = AlignmentRecord::table(&records);
        assert_eq!(table.rows[0][0], Cell::from("one to many"));
    }
}
