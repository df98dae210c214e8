//! Result tables and their export to TXT, CSV, TSV and JSON.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::prelude::*;
use clap::ValueEnum;
use csv::WriterBuilder;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Output format for exported tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Txt,
    Csv,
    Tsv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Json => "json",
        }
    }
}

/// One table cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Int(usize),
    Float(f64),
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<usize> for Cell {
    fn from(n: usize) -> Self {
        Cell::Int(n)
    }
}

impl From<f64> for Cell {
    fn from(x: f64) -> Self {
        Cell::Float(x)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Int(n) => write!(f, "{n}"),
            Cell::Float(x) => write!(f, "{x}"),
        }
    }
}

impl Cell {
    /// Value written to CSV/TSV; text is sanitized against formula injection.
    fn delimited(&self) -> String {
        match self {
            Cell::Text(s) => csv_safe_cell(s.clone()),
            other => other.to_string(),
        }
    }

    /// Value shown in the plain-text rendering; floats are rounded.
    fn display(&self) -> String {
        match self {
            Cell::Float(x) => format!("{x:.4}"),
            other => other.to_string(),
        }
    }
}

/// Column names plus rows of cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Table {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Left-aligned columns separated by two spaces.
    pub fn render_text(&self) -> String {
        let rendered: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|r| r.iter().map(Cell::display).collect())
            .collect();
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        for row in &rendered {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        let mut line = |cells: &[String]| {
            let padded: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(c, w)| format!("{c:<w$}", w = *w))
                .collect();
            out.push_str(padded.join("  ").trim_end());
            out.push('\n');
        };
        line(&self.columns);
        for row in &rendered {
            line(row);
        }
        out
    }

    /// Write header and rows as CSV (`b','`) or TSV (`b'\t'`).
    pub fn write_delimited<W: Write>(&self, writer: W, delimiter: u8) -> Result<()> {
        let mut wtr = WriterBuilder::new().delimiter(delimiter).from_writer(writer);
        wtr.write_record(&self.columns)?;
        for row in &self.rows {
            wtr.write_record(row.iter().map(Cell::delimited))?;
        }
        wtr.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// JSON array with one object per row, keyed by column name.
    pub fn to_json(&self) -> Value {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let obj: Map<String, Value> = self
                    .columns
                    .iter()
                    .zip(row)
                    .map(|(k, v)| (k.clone(), serde_json::to_value(v).unwrap_or(Value::Null)))
                    .collect();
                Value::Object(obj)
            })
            .collect();
        Value::Array(rows)
    }

    /// CSS style per cell: `color` where the cell text contains `keyword`,
    /// black elsewhere.
    pub fn highlight(&self, keyword: &str, color: &str) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| {
                        let chrome = if cell.to_string().contains(keyword) {
                            color
                        } else {
                            "black"
                        };
                        format!("color: {chrome}")
                    })
                    .collect()
            })
            .collect()
    }

    /// HTML table with [`Table::highlight`] styles applied.
    pub fn to_html(&self, keyword: &str, color: &str) -> String {
        let styles = self.highlight(keyword, color);
        let mut out = String::from("<table>\n<thead><tr>");
        for c in &self.columns {
            out.push_str(&format!("<th>{}</th>", escape_html(c)));
        }
        out.push_str("</tr></thead>\n<tbody>\n");
        for (row, row_styles) in self.rows.iter().zip(&styles) {
            out.push_str("<tr>");
            for (cell, style) in row.iter().zip(row_styles) {
                out.push_str(&format!(
                    "<td style=\"{}\">{}</td>",
                    escape_html(style),
                    escape_html(&cell.display())
                ));
            }
            out.push_str("</tr>\n");
        }
        out.push_str("</tbody>\n</table>\n");
        out
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Neutralize cells a spreadsheet would evaluate as a formula by prefixing `'`.
///
/// # Example
/// ```
/// use corpus_analysis::csv_safe_cell;
/// assert_eq!(csv_safe_cell("=SUM(A1)".to_string()), "'=SUM(A1)");
/// assert_eq!(csv_safe_cell("word".to_string()), "word");
/// ```
pub fn csv_safe_cell(cell: String) -> String {
    match cell.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => format!("'{cell}"),
        _ => cell,
    }
}

/// `<stem>_<YYYYMMDD_HHMMSS>_<kind>.<ext>`
pub fn export_file_name(stem: &str, kind: &str, format: ExportFormat) -> String {
    let local: DateTime<Local> = Local::now();
    format!(
        "{}_{}_{}.{}",
        stem,
        local.format("%Y%m%d_%H%M%S"),
        kind,
        format.extension()
    )
}

/// Write `table` into `dir` and return the file path.
pub fn export_table(
    table: &Table,
    stem: &str,
    kind: &str,
    format: ExportFormat,
    dir: &Path,
) -> Result<PathBuf> {
    let path = dir.join(export_file_name(stem, kind, format));
    let file = fs::File::create(&path).map_err(|e| Error::io(&path, e))?;
    match format {
        ExportFormat::Txt => {
            let mut file = file;
            file.write_all(table.render_text().as_bytes())
                .map_err(|e| Error::io(&path, e))?;
        }
        ExportFormat::Csv => table.write_delimited(file, b',')?,
        ExportFormat::Tsv => table.write_delimited(file, b'\t')?,
        ExportFormat::Json => serde_json::to_writer_pretty(file, &table.to_json())?,
    }
    log::info!("wrote {}", path.display());
    Ok(path)
}

/// Write the highlighted HTML rendering of `table` into `dir`.
pub fn export_highlighted(
    table: &Table,
    stem: &str,
    kind: &str,
    keyword: &str,
    color: &str,
    dir: &Path,
) -> Result<PathBuf> {
    let local: DateTime<Local> = Local::now();
    let name = format!("{}_{}_{}.html", stem, local.format("%Y%m%d_%H%M%S"), kind);
    let path = dir.join(name);
    fs::write(&path, table.to_html(keyword, color)).map_err(|e| Error::io(&path, e))?;
    log::info!("wrote {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut t = Table::new(["word", "frequency", "share"]);
        t.push_row(vec![Cell::from("apple"), Cell::from(3usize), Cell::from(0.75)]);
        t.push_row(vec![Cell::from("=pear"), Cell::from(1usize), Cell::from(0.25)]);
        t
    }

    #[test]
    fn renders_aligned_text() {
        let text = sample().render_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "word   frequency  share");
        assert_eq!(lines[1], "apple  3          0.7500");
    }

    #[test]
    fn delimited_output_sanitizes_text_only() {
        let mut buf = Vec::new();
        sample().write_delimited(&mut buf, b',').unwrap();
        let out = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "word,frequency,share");
        assert_eq!(lines[1], "apple,3,0.75");
        assert_eq!(lines[2], "'=pear,1,0.25");
    }

    #[test]
    fn json_rows_are_objects() {
        let v = sample().to_json();
        assert_eq!(v[0]["word"], "apple");
        assert_eq!(v[0]["frequency"], 3);
        assert_eq!(v[1]["share"], 0.25);
    }

    #[test]
    fn negative_numbers_are_not_prefixed() {
        let mut t = Table::new(["x"]);
        t.push_row(vec![Cell::Float(-0.5)]);
        let mut buf = Vec::new();
        t.write_delimited(&mut buf, b'\t').unwrap();
        assert!(String::from_utf8(buf).unwrap().ends_with("-0.5\n"));
    }

    #[test]
    fn highlight_marks_cells_containing_keyword() {
        let styles = sample().highlight("app", "red");
        assert_eq!(styles[0][0], "color: red");
        assert_eq!(styles[0][1], "color: black");
        assert_eq!(styles[1][0], "color: black");
        let html = sample().to_html("app", "red");
        assert!(html.contains("<td style=\"color: red\">apple</td>"));
    }

    #[test]
    fn html_escapes_markup_and_quotes() {
        let mut t = Table::new(["text"]);
        t.push_row(vec![Cell::from("it's <b> & \"x\"")]);
        let html = t.to_html("it's", "red");
        assert!(html.contains("<td style=\"color: red\">it&#39;s &lt;b&gt; &amp; &quot;x&quot;</td>"));
    }

    #[test]
    fn export_file_name_has_timestamp() {
        let name = export_file_name("corpus", "kwic", ExportFormat::Tsv);
        let re = regex::Regex::new(r"^corpus_\d{8}_\d{6}_kwic\.tsv$").unwrap();
        assert!(re.is_match(&name), "{name}");
    }
}
