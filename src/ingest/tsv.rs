// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Tesseract TSV parsing.
//!
//! `tesseract image out tsv` writes one row per layout element with a header
//! line naming the columns. Only level-5 rows (words) matter to us. Columns
//! are looked up by name, so column order and extra columns don't matter.

use crate::error::IngestError;

/// Tesseract's level for word rows.
pub const WORD_LEVEL: u32 = 5;

const REQUIRED: [&str; 12] = [
    "level", "page_num", "block_num", "par_num", "line_num", "word_num", "left", "top", "width",
    "height", "conf", "text",
];

/// One TSV row, with numeric columns parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct TsvRow {
    pub level: u32,
    pub page_num: String,
    pub block_num: String,
    pub par_num: String,
    pub line_num: String,
    pub word_num: i64,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    /// Recognition confidence, 0-100. Unparseable values become -1.
    pub conf: f64,
    pub text: String,
}

impl TsvRow {
    /// `page:block:par:line`, the key words are grouped into lines by.
    pub fn line_key(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.page_num, self.block_num, self.par_num, self.line_num
        )
    }
}

fn number(raw: &str) -> f64 {
    let raw = raw.trim();
    if raw.is_empty() {
        return 0.0;
    }
    raw.parse().unwrap_or(f64::NAN)
}

/// Parse a whole TSV document.
pub fn parse_tsv(input: &str) -> Result<Vec<TsvRow>, IngestError> {
    let mut lines = input.trim().lines();
    let header = lines
        .next()
        .filter(|h| !h.trim().is_empty())
        .ok_or(IngestError::EmptyTsv)?;
    let columns: Vec<&str> = header.split('\t').map(str::trim).collect();

    let mut positions = [0usize; REQUIRED.len()];
    for (slot, name) in positions.iter_mut().zip(REQUIRED) {
        *slot = columns
            .iter()
            .position(|c| *c == name)
            .ok_or(IngestError::MissingColumn(name))?;
    }
    let [level, page, block, par, line, word, left, top, width, height, conf, text] = positions;

    let rows = lines
        .map(|row| {
            let values: Vec<&str> = row.split('\t').collect();
            let field = |i: usize| values.get(i).copied().unwrap_or("");
            let confidence = number(field(conf));
            TsvRow {
                level: field(level).trim().parse().unwrap_or(0),
                page_num: field(page).to_string(),
                block_num: field(block).to_string(),
                par_num: field(par).to_string(),
                line_num: field(line).to_string(),
                word_num: field(word).trim().parse().unwrap_or(0),
                left: number(field(left)),
                top: number(field(top)),
                width: number(field(width)),
                height: number(field(height)),
                conf: if confidence.is_nan() { -1.0 } else { confidence },
                text: field(text).trim().to_string(),
            }
        })
        .collect();
    Ok(rows)
}
