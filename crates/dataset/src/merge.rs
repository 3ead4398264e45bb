//! Merge heterogeneous housing CSVs into a single training dataset.
//!
//! Source datasets come from different portals and disagree on almost
//! everything: delimiter, header casing, spacing, and what the price
//! column is called. The merge pass normalizes headers, canonicalizes the
//! target column to `sale_price`, takes the union of all columns, and
//! drops duplicate rows and rows with a missing or unparseable target.
//! Files that fail to parse are skipped with a warning; the merge is
//! best-effort.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Canonical name of the target column in the merged output.
pub const TARGET_COLUMN: &str = "sale_price";

/// Column names recognized as the sale-price target across sources.
const TARGET_ALIASES: &[&str] = &["price", "saleprice", "sale_price", "house_price", "target"];

/// Delimiters considered when sniffing a file's dialect.
const CANDIDATE_DELIMITERS: &[u8] = &[b',', b';', b'\t', b'|'];

/// Per-file merge statistics.
#[derive(Debug, Clone)]
pub struct FileSummary {
    pub path: PathBuf,
    pub rows: usize,
    pub columns: usize,
}

/// Overall merge statistics.
#[derive(Debug, Clone, Default)]
pub struct MergeSummary {
    pub files: Vec<FileSummary>,
    pub rows_written: usize,
    pub columns: usize,
    pub dropped_duplicates: usize,
    pub dropped_missing_target: usize,
}

/// Normalize a header name: trim, lower-case, spaces and hyphens to
/// underscores, plus the known `neaarby_schools` typo fix from one of the
/// source datasets.
pub fn normalize_header(name: &str) -> String {
    let normalized = name.trim().to_lowercase().replace([' ', '-'], "_");
    if normalized == "neaarby_schools" {
        "nearby_schools".to_string()
    } else {
        normalized
    }
}

/// Pick the delimiter that splits the header line into the most fields.
/// Ties (including a header with no delimiter at all) resolve to comma.
pub fn sniff_delimiter(header_line: &str) -> u8 {
    CANDIDATE_DELIMITERS
        .iter()
        .copied()
        .rev()
        .max_by_key(|&d| header_line.matches(d as char).count())
        .unwrap_or(b',')
}

/// One parsed source table.
struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

fn read_table(path: &Path) -> Result<Table> {
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let text = String::from_utf8_lossy(&raw);
    let header_line = text.lines().next().unwrap_or_default();
    let delimiter = sniff_delimiter(header_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut columns: Vec<String> = reader
        .headers()
        .with_context(|| format!("failed to parse headers of {}", path.display()))?
        .iter()
        .map(normalize_header)
        .collect();
    if columns.len() < 2 {
        bail!(
            "{} parsed to a single column, delimiter sniffing failed",
            path.display()
        );
    }
    // Canonicalize the first recognized target alias.
    for column in &mut columns {
        if TARGET_ALIASES.contains(&column.as_str()) {
            *column = TARGET_COLUMN.to_string();
            break;
        }
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.with_context(|| format!("failed to parse a row of {}", path.display()))?;
        let mut row: Vec<String> = record.iter().map(|c| c.trim().to_string()).collect();
        // Flexible parsing can yield ragged rows; align to the header width.
        row.resize(columns.len(), String::new());
        rows.push(row);
    }

    Ok(Table { columns, rows })
}

/// Merge every `*.csv` under `dir` (excluding the output file itself) into
/// a single CSV at `output`.
pub fn merge_directory(dir: &Path, output: &Path) -> Result<MergeSummary> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("failed to list {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
                && p.file_name() != output.file_name()
        })
        .collect();
    paths.sort();
    if paths.is_empty() {
        bail!("no CSV files found in {}", dir.display());
    }

    let mut tables = Vec::new();
    let mut summary = MergeSummary::default();
    for path in paths {
        match read_table(&path) {
            Ok(table) => {
                tracing::info!(
                    path = %path.display(),
                    rows = table.rows.len(),
                    columns = table.columns.len(),
                    "loaded dataset"
                );
                summary.files.push(FileSummary {
                    path: path.clone(),
                    rows: table.rows.len(),
                    columns: table.columns.len(),
                });
                tables.push(table);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping dataset");
            }
        }
    }
    if tables.is_empty() {
        bail!("no dataset in {} could be parsed", dir.display());
    }

    // Union of all columns, first-seen order, target column first so the
    // merged file always leads with it.
    let mut union: Vec<String> = vec![TARGET_COLUMN.to_string()];
    let mut seen: HashSet<String> = union.iter().cloned().collect();
    for table in &tables {
        for column in &table.columns {
            if seen.insert(column.clone()) {
                union.push(column.clone());
            }
        }
    }

    let slot_of: HashMap<&str, usize> = union
        .iter()
        .enumerate()
        .map(|(i, c)| (c.as_str(), i))
        .collect();
    let target_index = slot_of[TARGET_COLUMN];

    let mut writer = csv::Writer::from_path(output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    writer.write_record(&union)?;

    let mut emitted: HashSet<Vec<String>> = HashSet::new();
    for table in &tables {
        // Every source column was inserted into the union above.
        let slots: Vec<usize> = table
            .columns
            .iter()
            .map(|c| slot_of[c.as_str()])
            .collect();

        for row in &table.rows {
            let mut aligned = vec![String::new(); union.len()];
            for (value, &slot) in row.iter().zip(&slots) {
                aligned[slot] = value.clone();
            }

            let target = aligned[target_index].trim();
            if target.is_empty() || target.parse::<f64>().is_err() {
                summary.dropped_missing_target += 1;
                continue;
            }
            if !emitted.insert(aligned.clone()) {
                summary.dropped_duplicates += 1;
                continue;
            }
            writer.write_record(&aligned)?;
            summary.rows_written += 1;
        }
    }
    writer.flush()?;

    summary.columns = union.len();
    tracing::info!(
        output = %output.display(),
        rows = summary.rows_written,
        columns = summary.columns,
        dropped_duplicates = summary.dropped_duplicates,
        dropped_missing_target = summary.dropped_missing_target,
        "merged dataset written"
    );
    Ok(summary)
}
