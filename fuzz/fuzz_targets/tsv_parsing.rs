// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for tesseract TSV ingestion.
//!
//! The parser sees files straight off disk. Truncated rows, missing
//! columns, and garbage numbers must come back as errors or skipped rows,
//! never as a panic.

#![no_main]

use chronicle::ingest::{group_lines, parse_tsv};
use chronicle::{FragmentKind, IngestOptions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);
    let Ok(rows) = parse_tsv(&input) else {
        return;
    };

    let options = IngestOptions::default();
    let fragments = group_lines(&rows, &options);
    let lines: Vec<_> = fragments
        .iter()
        .filter(|f| f.kind == FragmentKind::Line)
        .collect();

    // One line per distinct line key at most
    let mut keys: Vec<String> = rows.iter().map(|r| r.line_key()).collect();
    keys.sort();
    keys.dedup();
    assert!(lines.len() <= keys.len());

    for line in &lines {
        assert!(!line.norm.is_empty(), "empty line {:?}", line.id);
    }

    // Lines come before words
    let first_word = fragments.iter().position(|f| f.kind == FragmentKind::Word);
    if let Some(first_word) = first_word {
        assert!(fragments[first_word..].iter().all(|f| f.kind == FragmentKind::Word));
    }
});
