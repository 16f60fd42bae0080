// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use anyhow::{bail, Context, Result};
use chronicle::{
    open_source, run_ingest, ChronicleConfig, Corpus, FragmentKind, HeadlessViewer,
    IngestOptions, SearchSession, Tier, TierLoad, TierLoader,
};
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use url::Url;

mod cli;
use cli::display::{self, Tone, BOLD, DIM};
use cli::{Cli, Commands};

/// Page the headless session pretends to be mounted on.
const HEADLESS_PAGE: &str = "http://localhost/";

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Ingest {
            tsv,
            out_dir,
            overrides,
            min_conf,
            min_word_chars,
        } => {
            let options = IngestOptions {
                min_conf,
                min_word_chars,
            };
            run_ingest_command(&tsv, &out_dir, overrides.as_deref(), &options)
        }
        Commands::Search {
            query,
            corpus,
            limit,
            focus,
            timeout,
        } => run_search(
            cli.config.as_deref(),
            &query,
            &corpus,
            limit,
            focus,
            Duration::from_secs(timeout),
        ),
        Commands::Inspect { corpus, timeout } => {
            run_inspect(cli.config.as_deref(), &corpus, Duration::from_secs(timeout))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr so stdout stays clean for the report. `RUST_LOG` overrides.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chronicle=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// =============================================================================
// INGEST
// =============================================================================

fn run_ingest_command(
    tsv: &Path,
    out_dir: &Path,
    overrides: Option<&Path>,
    options: &IngestOptions,
) -> Result<()> {
    let started = Instant::now();
    let summary = run_ingest(tsv, out_dir, overrides, options)
        .with_context(|| format!("ingesting {}", tsv.display()))?;

    display::section_top("INGEST");
    display::field("source", &display::truncate_chars(&tsv.display().to_string(), 58));
    display::field("output", &display::truncate_chars(&summary.out_dir.display().to_string(), 58));
    display::section_mid("FRAGMENTS");
    display::field("lines", &summary.lines.to_string());
    display::field("words", &summary.words.to_string());
    display::field("overrides", &summary.overrides.to_string());
    display::field("entries", &summary.entries.to_string());
    display::field(
        "elapsed",
        &display::timing_ms(started.elapsed().as_secs_f64() * 1000.0),
    );
    display::section_bot();
    Ok(())
}

// =============================================================================
// SEARCH
// =============================================================================

fn run_search(
    config_path: Option<&Path>,
    query: &str,
    corpus: &str,
    limit: usize,
    focus: Option<(f64, f64)>,
    timeout: Duration,
) -> Result<()> {
    let mut config = ChronicleConfig::load(config_path).context("loading config")?;
    config.session.max_suggestions = limit.max(1);

    let source = open_source(corpus).with_context(|| format!("opening corpus {}", corpus))?;
    // Route the query through the page URL so it takes the deep-link path:
    // seeded once the line tier lands, first match committed once the viewer is up.
    let page = Url::parse_with_params(HEADLESS_PAGE, &[("q", query)])
        .context("building headless page URL")?;
    let (width, height) = focus.unwrap_or((1.0, 1.0));
    let viewer = HeadlessViewer::new(width, height);

    let started = Instant::now();
    let mut session = SearchSession::new(&config, source, viewer, page)
        .context("starting index worker")?;
    if focus.is_some() {
        session.viewer_ready();
    }
    if !session.settle(timeout) {
        session.teardown();
        bail!("timed out after {:?} waiting for corpus and index", timeout);
    }
    if let Some(message) = session.error() {
        let message = message.to_string();
        session.teardown();
        bail!("{}", message);
    }
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    let title = format!("SEARCH \"{}\"", display::truncate_chars(query, 40));
    display::section_top(&title);
    display::field("normalized", session.normalized_query());
    display::field("matches", &session.match_count().to_string());
    display::field("elapsed", &display::timing_ms(elapsed_ms));
    display::field("url", session.url().as_str());

    let suggestions = session.suggestions();
    if !suggestions.is_empty() {
        display::section_mid("SUGGESTIONS");
        for (i, s) in suggestions.iter().enumerate() {
            let head = format!(
                " {} {:>2}. {} {} {}",
                display::active_marker(s.active),
                i + 1,
                display::kind_label(s.kind),
                display::confidence_badge(s.confidence),
                display::paint(Tone::Heading, &[BOLD], &display::truncate_chars(&s.text, 48)),
            );
            display::row(&head);
            if s.context != s.text {
                let context = display::truncate_chars(&s.context, display::BOX_WIDTH - 9);
                display::row(&format!("        {}", display::paint(Tone::Muted, &[DIM], &context)));
            }
        }
    }

    if focus.is_some() {
        display::section_mid("VIEWPORT");
        match (session.selected(), session.viewport().highlight()) {
            (Some(fragment), Some(highlight)) => {
                let b = fragment.bbox;
                let r = highlight.rect;
                display::field("selected", &fragment.id);
                display::field(
                    "image bbox",
                    &format!("{:.0}, {:.0}  {:.0} x {:.0}", b.x, b.y, b.width, b.height),
                );
                display::field(
                    "viewport rect",
                    &format!("{:.5}, {:.5}  {:.5} x {:.5}", r.x, r.y, r.width, r.height),
                );
            }
            _ => display::row(" nothing to focus"),
        }
    }
    display::section_bot();

    session.teardown();
    Ok(())
}

// =============================================================================
// INSPECT
// =============================================================================

fn run_inspect(config_path: Option<&Path>, corpus_location: &str, timeout: Duration) -> Result<()> {
    let config = ChronicleConfig::load(config_path).context("loading config")?;
    let source = open_source(corpus_location)
        .with_context(|| format!("opening corpus {}", corpus_location))?;
    let description = source.describe();

    let mut loader = TierLoader::new(source, config.endpoints.clone());
    for tier in Tier::ALL {
        loader.request(tier);
    }

    let mut corpus = Corpus::new();
    let mut legacy = false;
    let mut failures = Vec::new();
    while loader.in_flight() > 0 {
        let Some(event) = loader.next_timeout(timeout) else {
            bail!("timed out after {:?} waiting for {}", timeout, description);
        };
        match event {
            TierLoad::Loaded {
                tier,
                fragments,
                legacy: from_legacy,
            } => {
                legacy |= from_legacy;
                corpus.install(tier, fragments);
            }
            TierLoad::Failed { tier, error } => failures.push((tier, error)),
        }
    }
    if !corpus.is_loaded(Tier::Line) {
        if let Some((_, error)) = failures.into_iter().find(|(tier, _)| *tier == Tier::Line) {
            return Err(error).context("loading line tier");
        }
        bail!("line tier did not load");
    }

    display::section_top("CORPUS");
    display::field("source", &display::truncate_chars(&description, 58));
    display::field("layout", if legacy { "legacy entries.json" } else { "tiered" });
    display::section_mid("TIERS");
    for tier in Tier::ALL {
        let count = corpus.tier(tier).map_or(0, |f| f.len());
        display::field(
            tier.as_str(),
            &format!(
                "{}  {}",
                display::pad_left(&count.to_string(), 8),
                display::tier_status(corpus.is_loaded(tier))
            ),
        );
    }
    for (tier, error) in &failures {
        display::field(
            &format!("{} error", tier),
            &display::truncate_chars(&error.to_string(), 58),
        );
    }

    display::section_mid("FRAGMENTS");
    let entries = corpus.entries();
    let kind_count = |kind: FragmentKind| entries.iter().filter(|f| f.kind == kind).count();
    display::field("total", &corpus.len().to_string());
    display::field(
        "kinds",
        &format!(
            "{} {}  {} {}",
            display::kind_label(FragmentKind::Line),
            kind_count(FragmentKind::Line),
            display::kind_label(FragmentKind::Word),
            kind_count(FragmentKind::Word)
        ),
    );
    if !entries.is_empty() {
        let mean = entries.iter().map(|f| f.conf).sum::<f64>() / entries.len() as f64;
        display::field(
            "mean confidence",
            &display::confidence_badge((mean.clamp(0.0, 1.0) * 100.0).round() as u32),
        );
        let low = entries.iter().filter(|f| f.conf < 0.5).count();
        display::field("below 50%", &low.to_string());
        let malformed = entries.iter().filter(|f| !f.bbox.is_well_formed()).count();
        display::field("malformed bbox", &malformed.to_string());
    }

    let duplicates = corpus.duplicate_ids();
    display::field("duplicate ids", &duplicates.len().to_string());
    for id in duplicates.iter().take(5) {
        display::row(&format!("   {}", display::truncate_chars(id, display::BOX_WIDTH - 4)));
    }
    display::section_bot();
    Ok(())
}
