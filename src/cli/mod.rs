// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the chronicle command-line interface.
//!
//! Three subcommands: `ingest` turns raw Tesseract TSV into the tiered corpus
//! JSON the viewer fetches, `search` drives a full headless session against a
//! corpus directory or URL (same worker, same stale-reply handling, same
//! deep-link commit as the browser), and `inspect` summarizes what a corpus
//! actually contains.

pub mod display;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "chronicle",
    about = "Fuzzy OCR search over a deep-zoom timeline scan",
    version
)]
pub struct Cli {
    /// JSON config file (falls back to $CHRONICLE_CONFIG, then defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert Tesseract TSV output into lines.json, words.json and entries.json
    Ingest {
        /// Tesseract TSV file (`tesseract scan.png out tsv`)
        tsv: PathBuf,

        /// Output directory for the corpus files
        #[arg(short, long)]
        out_dir: PathBuf,

        /// Hand-curated fragments to prepend (JSON array)
        #[arg(long)]
        overrides: Option<PathBuf>,

        /// Drop OCR words below this confidence (0-100)
        #[arg(long, default_value = "20")]
        min_conf: f64,

        /// Shortest normalized word emitted into the word tier
        #[arg(long, default_value = "2")]
        min_word_chars: usize,
    },

    /// Run a query through a headless session and print the suggestions
    Search {
        /// Search query (normalized the same way the viewer does)
        query: String,

        /// Corpus root: a directory, a file:// URL or an http(s) URL
        #[arg(short, long)]
        corpus: String,

        /// Maximum number of suggestions to print
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Jump to the best match on a WIDTHxHEIGHT image and print the viewport rect
        #[arg(long, value_parser = parse_image_size)]
        focus: Option<(f64, f64)>,

        /// Give up waiting for the corpus and worker after this many seconds
        #[arg(long, default_value = "30")]
        timeout: u64,
    },

    /// Summarize the fragments a corpus serves
    Inspect {
        /// Corpus root: a directory, a file:// URL or an http(s) URL
        corpus: String,

        /// Give up waiting for each tier after this many seconds
        #[arg(long, default_value = "30")]
        timeout: u64,
    },
}

/// Parse `WIDTHxHEIGHT` into positive pixel dimensions.
fn parse_image_size(raw: &str) -> Result<(f64, f64), String> {
    let (w, h) = raw
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got `{}`", raw))?;
    let width: f64 = w
        .trim()
        .parse()
        .map_err(|_| format!("invalid width `{}`", w))?;
    let height: f64 = h
        .trim()
        .parse()
        .map_err(|_| format!("invalid height `{}`", h))?;
    if width <= 0.0 || height <= 0.0 {
        return Err(format!("image size must be positive, got {}x{}", width, height));
    }
    Ok((width, height))
}
