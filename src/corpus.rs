//! Corpus loading, substitution preprocessing and stopword lists.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::{debug, info};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// One named document of a corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub name: String,
    pub text: String,
}

/// Ordered collection of uniquely named documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    documents: Vec<Document>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document. An existing name keeps its position and gets the new text.
    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) {
        let name = name.into();
        let text = text.into();
        match self.documents.iter_mut().find(|d| d.name == name) {
            Some(doc) => doc.text = text,
            None => self.documents.push(Document { name, text }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.documents
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.text.as_str())
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.documents.iter().map(|d| d.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Every document text joined with newlines, e.g. for language detection.
    pub fn joined_text(&self) -> String {
        self.documents
            .iter()
            .map(|d| d.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<N: Into<String>, T: Into<String>> FromIterator<(N, T)> for Corpus {
    fn from_iter<I: IntoIterator<Item = (N, T)>>(iter: I) -> Self {
        let mut corpus = Corpus::new();
        for (name, text) in iter {
            corpus.insert(name, text);
        }
        corpus
    }
}

/// Read every `*.txt` file directly inside `dir`, sorted by file name.
pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Corpus> {
    let dir = dir.as_ref();
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
            Error::io(dir, source)
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(".txt") {
            files.push((name, entry.into_path()));
        }
    }
    files.sort_by(|a, b| a.0.cmp(&b.0));

    let mut corpus = Corpus::new();
    for (name, path) in files {
        let text = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        debug!("loaded {} ({} bytes)", name, text.len());
        corpus.insert(name, text);
    }
    info!("loaded {} documents from {}", corpus.len(), dir.display());
    Ok(corpus)
}

/// Replace every occurrence of `from` with `to` in each document.
pub fn preprocess(corpus: &Corpus, from: &str, to: &str) -> Corpus {
    corpus
        .iter()
        .map(|d| (d.name.clone(), d.text.replace(from, to)))
        .collect()
}

/// A stoplist, one entry per line of its source file.
///
/// Line terminators are stripped before comparison, so a final line without a
/// newline matches like every other line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Stopwords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Ok(Self::from_lines(&content))
    }

    pub fn from_lines(content: &str) -> Self {
        content
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .filter(|l| !l.is_empty())
            .collect()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for Stopwords {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Stopwords {
            words: iter.into_iter().map(String::from).collect(),
        }
    }
}
