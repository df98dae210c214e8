#![forbid(unsafe_code)]
//! # Corpus Analysis CLI
//!
//! Command-line interface for the `corpus_analysis` crate. Every corpus
//! command reads the `.txt` files of one directory, prints its result table
//! and exports it next to the working directory (or `--out`).
//!
//! ## Example
//! ```bash
//! cargo run --release -- kwic path/to/corpus 经济 --lang zh --window 5 --export-format csv
//! cargo run --release -- lexical path/to/corpus --lang en --revision revised
//! ```
//!
//! See `--help` for all available options.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand};
use log::{error, info};

use corpus_analysis::{
    AlignmentRecord, ConcordanceHit, Corpus, Error, ExportFormat, FrequencyList, KwicMode,
    KwicOptions, Language, LanguageProfile, LexicalStats, Result, SentenceStats, StatsOptions,
    StatsRevision, Stopwords, SttrPolicy, Table, classify, clause_lengths, corpus_distribution,
    corpus_frequency, export_highlighted, export_table, kwic, lexical_table, load_dir,
    preprocess, print_failed_files, read_parallel_table, sentence_table, summarize, tile_labels,
};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct OutputArgs {
    /// Output format for export (txt, csv, tsv, json)
    #[arg(long, default_value = "txt")]
    export_format: ExportFormat,

    /// Directory the export is written to
    #[arg(long, default_value = ".")]
    out: PathBuf,
}

#[derive(Args)]
struct CorpusArgs {
    /// Directory containing the .txt documents
    dir: PathBuf,

    /// Corpus language: zh, en or auto
    #[arg(long, default_value = "auto")]
    lang: String,

    /// Replace FROM with TO in every document before analysis (repeatable)
    #[arg(long, num_args = 2, value_names = ["FROM", "TO"], action = ArgAction::Append)]
    replace: Vec<String>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct StatsArgs {
    /// Which revision of the statistics to compute
    #[arg(long, value_enum, default_value = "original")]
    revision: StatsRevision,

    /// STTR handling of the trailing short chunk
    #[arg(long, value_enum, default_value = "padded")]
    sttr: SttrPolicy,

    /// Skip documents that fail instead of aborting (exit status stays 1)
    #[arg(long, default_value_t = false)]
    keep_going: bool,
}

impl StatsArgs {
    fn options(&self) -> StatsOptions {
        StatsOptions {
            revision: self.revision,
            sttr: self.sttr,
            isolate_failures: self.keep_going,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Token, type, TTR/STTR, word length and word-class statistics
    Lexical {
        #[command(flatten)]
        corpus: CorpusArgs,
        #[command(flatten)]
        stats: StatsArgs,
    },
    /// Sentence counts, sentence types and punctuation proportions
    Sentences {
        #[command(flatten)]
        corpus: CorpusArgs,
        #[command(flatten)]
        stats: StatsArgs,
    },
    /// Clause-length distribution (Chinese only)
    Clauses {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Smallest clause length counted
        #[arg(long, default_value_t = 1)]
        start: usize,
        /// Clause length the table stops before
        #[arg(long, default_value_t = 30)]
        end: usize,
        #[arg(long, value_enum, default_value = "original")]
        revision: StatsRevision,
    },
    /// Keyword-in-context concordance
    Kwic {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Keyword, phrase or pattern
        keyword: String,
        /// Context window size in tokens on each side
        #[arg(long, default_value_t = 4)]
        window: usize,
        /// Matching mode: "regex" or omitted
        #[arg(long)]
        mode: Option<String>,
        /// Show token/tag pairs instead of bare tokens
        #[arg(long, default_value_t = false)]
        pos: bool,
        /// Also write an HTML table with the keyword in this color
        #[arg(long, value_name = "COLOR")]
        highlight: Option<String>,
    },
    /// Word frequency ranking
    Freq {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Stopword file (.txt, one word per line)
        #[arg(long)]
        stopwords: Option<PathBuf>,
        /// First rank to report (0-based)
        #[arg(long, default_value_t = 0)]
        start: usize,
        /// Rank the report stops before
        #[arg(long, default_value_t = 20)]
        end: usize,
        /// Rank all documents together instead of one list per document
        #[arg(long, default_value_t = false)]
        combine: bool,
    },
    /// Keyword occurrences per tile of each document
    Dist {
        #[command(flatten)]
        corpus: CorpusArgs,
        keyword: String,
        /// Number of tiles: 1, 2, 5 or 10
        #[arg(long, default_value_t = 5)]
        tiles: usize,
    },
    /// Classify the rows of a parallel source/target table
    Align {
        /// CSV or TSV file with a header row
        file: PathBuf,
        /// Name of the source text column
        #[arg(long)]
        source: String,
        /// Name of the target text column
        #[arg(long)]
        target: String,
        /// Target language: zh, en or auto
        #[arg(long, default_value = "auto")]
        lang: String,
        /// Field delimiter: a single ASCII character or "tab"
        #[arg(long, default_value = ",", value_parser = parse_delimiter)]
        delimiter: u8,
        /// Report type proportions instead of per-row types
        #[arg(long, default_value_t = false)]
        summary: bool,
        #[command(flatten)]
        output: OutputArgs,
    },
}

fn parse_delimiter(s: &str) -> std::result::Result<u8, String> {
    match s {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        _ => match s.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(format!("delimiter must be one ASCII character, got {s:?}")),
        },
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(failed) => {
            if !failed.is_empty() {
                print_failed_files(&failed);
                process::exit(1);
            }
        }
        Err(e) => {
            error!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Run one command; returns documents skipped under `--keep-going`.
fn run(command: Command) -> Result<Vec<(String, String)>> {
    match command {
        Command::Lexical { corpus, stats } => {
            let (docs, profile) = load_corpus(&corpus)?;
            let opts = stats.options();
            let report = lexical_table(&docs, profile, &opts)?;
            emit(
                &LexicalStats::table(&report.rows, opts.revision),
                &corpus.dir,
                "lexical",
                &corpus.output,
            )?;
            Ok(report.failed)
        }
        Command::Sentences { corpus, stats } => {
            let (docs, profile) = load_corpus(&corpus)?;
            let report = sentence_table(&docs, profile, &stats.options())?;
            emit(&SentenceStats::table(&report.rows), &corpus.dir, "sentences", &corpus.output)?;
            Ok(report.failed)
        }
        Command::Clauses {
            corpus,
            start,
            end,
            revision,
        } => {
            let (docs, profile) = load_corpus(&corpus)?;
            let lengths = clause_lengths(&docs, profile, start, end, revision)?;
            emit(&lengths.table(), &corpus.dir, "clauses", &corpus.output)?;
            Ok(Vec::new())
        }
        Command::Kwic {
            corpus,
            keyword,
            window,
            mode,
            pos,
            highlight,
        } => {
            let opts = KwicOptions {
                window,
                mode: KwicMode::parse(mode.as_deref())?,
                include_pos: pos,
            };
            let (docs, profile) = load_corpus(&corpus)?;
            let hits = kwic(&docs, &keyword, profile, &opts)?;
            if hits.is_empty() {
                println!("Input not found.");
                return Ok(Vec::new());
            }
            let table = ConcordanceHit::table(&hits);
            emit(&table, &corpus.dir, "kwic", &corpus.output)?;
            if let Some(color) = highlight {
                let path = export_highlighted(
                    &table,
                    &file_stem(&corpus.dir),
                    "kwic",
                    &keyword,
                    &color,
                    &corpus.output.out,
                )?;
                println!("Highlighted table written to {}", path.display());
            }
            Ok(Vec::new())
        }
        Command::Freq {
            corpus,
            stopwords,
            start,
            end,
            combine,
        } => {
            let stop = match &stopwords {
                Some(path) => Stopwords::load(path)?,
                None => Stopwords::new(),
            };
            info!("{} stopwords", stop.len());
            let (docs, profile) = load_corpus(&corpus)?;
            let lists = corpus_frequency(&docs, profile, &stop, start, end, combine);
            emit(
                &FrequencyList::combined_table(&lists),
                &corpus.dir,
                "freq",
                &corpus.output,
            )?;
            Ok(Vec::new())
        }
        Command::Dist {
            corpus,
            keyword,
            tiles,
        } => {
            tile_labels(tiles)?;
            let (docs, profile) = load_corpus(&corpus)?;
            let dist = corpus_distribution(&docs, &keyword, profile, tiles)?;
            emit(&dist.table(), &corpus.dir, "dist", &corpus.output)?;
            Ok(Vec::new())
        }
        Command::Align {
            file,
            source,
            target,
            lang,
            delimiter,
            summary,
            output,
        } => {
            let requested = requested_language(&lang)?;
            let rows = read_parallel_table(&file, &source, &target, delimiter)?;
            let language = match requested {
                Some(language) => language,
                None => {
                    let targets: Vec<&str> = rows.iter().map(|r| r.target.as_str()).collect();
                    Language::detect(&targets.join("\n"))?
                }
            };
            let records = classify(&rows, language.profile());
            if summary {
                emit(&summarize(&records)?.table(), &file, "alignment_summary", &output)?;
            } else {
                emit(&AlignmentRecord::table(&records), &file, "alignment", &output)?;
            }
            Ok(Vec::new())
        }
    }
}

/// `None` for `auto`, otherwise the validated language.
fn requested_language(code: &str) -> Result<Option<Language>> {
    match code {
        "auto" => Ok(None),
        code => Language::from_code(code).map(Some),
    }
}

/// Load the corpus directory, apply `--replace` pairs in order and resolve
/// the language profile.
fn load_corpus(args: &CorpusArgs) -> Result<(Corpus, &'static dyn LanguageProfile)> {
    let requested = requested_language(&args.lang)?;
    let mut corpus = load_dir(&args.dir)?;
    for pair in args.replace.chunks(2) {
        if let [from, to] = pair {
            corpus = preprocess(&corpus, from, to);
        }
    }
    let language = match requested {
        Some(language) => language,
        None => Language::detect(&corpus.joined_text())?,
    };
    info!("analyzing {} documents as {}", corpus.len(), language);
    Ok((corpus, language.profile()))
}

/// Print `table` and export it into the output directory.
fn emit(table: &Table, input: &Path, kind: &str, output: &OutputArgs) -> Result<()> {
    print!("{}", table.render_text());
    fs::create_dir_all(&output.out).map_err(|e| Error::Io {
        path: output.out.clone(),
        source: e,
    })?;
    let path = export_table(table, &file_stem(input), kind, output.export_format, &output.out)?;
    println!("Results written to {}", path.display());
    Ok(())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "corpus".to_string())
}
