// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Offline ingestion: Tesseract TSV → corpus JSON.
//!
//! The pipeline:
//!
//! 1. Parse the TSV and keep confident word rows (level 5, non-empty text,
//!    `conf >= min_conf`).
//! 2. Group words into lines by `page:block:par:line`, in order of first
//!    appearance; sort each line's words by `word_num`.
//! 3. Emit one line fragment per group (text joined by spaces, bbox = union,
//!    conf = mean) and one word fragment per word whose normalized text is
//!    long enough to be worth searching.
//! 4. Prepend hand-written overrides.
//! 5. Write `entries.json` (everything), `lines.json` and `words.json`.
//!
//! Ids are derived from the grouping key (`line-1:2:1:3`, `word-1:2:1:3-4`),
//! so re-running ingestion on the same scan yields the same ids and deep
//! links keep working.

mod overrides;
mod tsv;

pub use overrides::*;
pub use tsv::*;

use crate::error::IngestError;
use crate::types::{BBox, Fragment, FragmentKind};
use crate::util::normalize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[cfg(feature = "parallel")]
use indicatif::{ProgressBar, ProgressStyle};

/// Output file names inside the output directory.
pub const ENTRIES_FILE: &str = "entries.json";
pub const LINES_FILE: &str = "lines.json";
pub const WORDS_FILE: &str = "words.json";

/// Ingestion filters.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestOptions {
    /// Minimum Tesseract confidence (0-100) for a word to be kept at all.
    pub min_conf: f64,
    /// Minimum normalized length for a word to get its own fragment.
    pub min_word_chars: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            min_conf: 20.0,
            min_word_chars: 2,
        }
    }
}

/// The three output sets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestOutput {
    pub entries: Vec<Fragment>,
    pub lines: Vec<Fragment>,
    pub words: Vec<Fragment>,
}

impl IngestOutput {
    /// Overrides first, then generated fragments; tiers split by kind.
    pub fn assemble(overrides: Vec<Fragment>, generated: Vec<Fragment>) -> Self {
        let entries: Vec<Fragment> = overrides.into_iter().chain(generated).collect();
        let (lines, words) = entries
            .iter()
            .cloned()
            .partition(|f| f.kind == FragmentKind::Line);
        Self {
            entries,
            lines,
            words,
        }
    }
}

/// What `run_ingest` wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestSummary {
    pub entries: usize,
    pub lines: usize,
    pub words: usize,
    pub overrides: usize,
    pub out_dir: PathBuf,
}

fn confidence(percent: f64) -> f64 {
    (percent / 100.0).clamp(0.0, 1.0)
}

/// Group word rows into line and word fragments (lines first).
pub fn group_lines(rows: &[TsvRow], options: &IngestOptions) -> Vec<Fragment> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<&TsvRow>> = HashMap::new();

    for row in rows {
        if row.level != WORD_LEVEL || row.text.is_empty() || row.conf < options.min_conf {
            continue;
        }
        let key = row.line_key();
        groups
            .entry(key.clone())
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(row);
    }

    let mut lines = Vec::new();
    let mut words_out = Vec::new();

    for key in order {
        let Some(mut words) = groups.remove(&key) else {
            continue;
        };
        words.sort_by_key(|w| w.word_num);

        let text = words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let norm = normalize(&text);
        if norm.is_empty() {
            continue;
        }

        let mut bbox: Option<BBox> = None;
        let mut conf_sum = 0.0;
        for row in &words {
            let word_box = BBox::new(row.left, row.top, row.width, row.height);
            bbox = Some(match bbox {
                Some(b) => b.union(&word_box),
                None => word_box,
            });
            conf_sum += row.conf;

            let word_norm = normalize(&row.text);
            if word_norm.chars().count() >= options.min_word_chars {
                words_out.push(Fragment {
                    id: format!("word-{key}-{}", row.word_num),
                    text: row.text.clone(),
                    norm: word_norm,
                    context: Some(text.clone()),
                    bbox: word_box,
                    conf: confidence(row.conf),
                    kind: FragmentKind::Word,
                });
            }
        }

        let Some(bbox) = bbox else {
            continue;
        };
        lines.push(Fragment {
            id: format!("line-{key}"),
            norm,
            context: Some(text.clone()),
            bbox,
            conf: confidence(conf_sum / words.len() as f64),
            kind: FragmentKind::Line,
            text,
        });
    }

    lines.extend(words_out);
    lines
}

/// Create a progress style for the write progress bar
#[cfg(feature = "parallel")]
fn create_progress_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {prefix:<12} [{bar:40.cyan/dim}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━━╸")
}

fn write_json(path: &Path, fragments: &[Fragment]) -> Result<(), IngestError> {
    let json = serde_json::to_string_pretty(fragments).map_err(|source| IngestError::Json {
        path: path.display().to_string(),
        source,
    })?;
    fs::write(path, json).map_err(|source| IngestError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Run the whole pipeline and write the three corpus files into `out_dir`.
pub fn run_ingest(
    tsv_path: &Path,
    out_dir: &Path,
    overrides_path: Option<&Path>,
    options: &IngestOptions,
) -> Result<IngestSummary, IngestError> {
    let raw = fs::read_to_string(tsv_path).map_err(|source| IngestError::Io {
        path: tsv_path.display().to_string(),
        source,
    })?;
    let rows = parse_tsv(&raw)?;
    let generated = group_lines(&rows, options);
    let overrides = match overrides_path {
        Some(path) => load_overrides(path)?,
        None => Vec::new(),
    };
    let override_count = overrides.len();
    let output = IngestOutput::assemble(overrides, generated);

    fs::create_dir_all(out_dir).map_err(|source| IngestError::Io {
        path: out_dir.display().to_string(),
        source,
    })?;

    let files: [(&str, &[Fragment]); 3] = [
        (ENTRIES_FILE, output.entries.as_slice()),
        (LINES_FILE, output.lines.as_slice()),
        (WORDS_FILE, output.words.as_slice()),
    ];

    #[cfg(feature = "parallel")]
    let write_pb = ProgressBar::new(files.len() as u64);
    #[cfg(feature = "parallel")]
    write_pb.set_style(create_progress_style());
    #[cfg(feature = "parallel")]
    write_pb.set_prefix("Writing");

    for (name, fragments) in files {
        write_json(&out_dir.join(name), fragments)?;
        #[cfg(feature = "parallel")]
        write_pb.set_message(format!("{} ({} fragments)", name, fragments.len()));
        #[cfg(feature = "parallel")]
        write_pb.inc(1);
    }

    #[cfg(feature = "parallel")]
    write_pb.finish_and_clear();

    let summary = IngestSummary {
        entries: output.entries.len(),
        lines: output.lines.len(),
        words: output.words.len(),
        overrides: override_count,
        out_dir: out_dir.to_path_buf(),
    };
    info!(
        entries = summary.entries,
        lines = summary.lines,
        words = summary.words,
        overrides = summary.overrides,
        "ingestion complete"
    );
    Ok(summary)
}
