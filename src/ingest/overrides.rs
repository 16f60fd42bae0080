// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Hand-written fragment overrides.
//!
//! OCR misses things: stylized titles, vertical text, faded stamps. An
//! overrides file lets a curator add fragments by hand. The format is loose on
//! purpose. Only `text` and `bbox` are required, everything else has a
//! default, and malformed items are skipped instead of failing the build.

use crate::error::IngestError;
use crate::types::{BBox, Fragment, FragmentKind};
use crate::util::normalize;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::Path;
use tracing::warn;

/// Parse an overrides document. Anything but a JSON array yields no fragments.
pub fn parse_overrides(raw: &str, origin: &str) -> Result<Vec<Fragment>, IngestError> {
    let value: Value = serde_json::from_str(raw).map_err(|source| IngestError::Json {
        path: origin.to_string(),
        source,
    })?;
    let Value::Array(items) = value else {
        warn!(origin, "overrides file is not an array, ignoring");
        return Ok(Vec::new());
    };

    let usable = items.iter().filter(|item| {
        item.get("text").is_some_and(Value::is_string) && item.get("bbox").is_some_and(Value::is_array)
    });

    let mut fragments = Vec::new();
    for (index, item) in usable.enumerate() {
        let Some(fragment) = override_fragment(index, item) else {
            warn!(origin, index, "override bbox is not four numbers, skipping");
            continue;
        };
        fragments.push(fragment);
    }
    Ok(fragments)
}

fn override_fragment(index: usize, item: &Value) -> Option<Fragment> {
    let text = item.get("text")?.as_str()?.to_string();
    let bbox: [f64; 4] = serde_json::from_value(item.get("bbox")?.clone()).ok()?;
    let string = |key: &str| item.get(key).and_then(Value::as_str).map(str::to_string);

    Some(Fragment {
        id: string("id").unwrap_or_else(|| format!("override-{index}")),
        norm: string("norm").unwrap_or_else(|| normalize(&text)),
        context: Some(string("context").unwrap_or_else(|| text.clone())),
        bbox: BBox::from(bbox),
        conf: item.get("conf").and_then(Value::as_f64).unwrap_or(1.0),
        kind: if item.get("kind").and_then(Value::as_str) == Some("word") {
            FragmentKind::Word
        } else {
            FragmentKind::Line
        },
        text,
    })
}

/// Load overrides from `path`. A missing file means no overrides.
pub fn load_overrides(path: &Path) -> Result<Vec<Fragment>, IngestError> {
    let origin = path.display().to_string();
    match fs::read_to_string(path) {
        Ok(raw) => parse_overrides(&raw, &origin),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(source) => Err(IngestError::Io {
            path: origin,
            source,
        }),
    }
}
