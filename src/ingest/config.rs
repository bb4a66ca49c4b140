// src/ingest/config.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::ingest::providers::sheet::{build_client, SheetTsvProvider};
use crate::ingest::row::{ColumnSchema, DEFAULT_MAX_NUMBERED_FIELDS, DEFAULT_PLACEHOLDER_THUMBNAIL};
use crate::ingest::types::{Category, SheetProvider};

pub const ENV_PATH: &str = "QUIZ_SOURCES_PATH";

const SHEET_BASE: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vTFHNc8wXflaEZIkBqtoYK5M7bCPG4aYuIIa_mYjmFJWZALPWNPrOycdoAtJZNRiS_u9tL9S3oaw3p3/pub";

/// One published sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub category: Category,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
    pub sources: Vec<SourceEntry>,
    pub max_numbered_fields: usize,
    pub placeholder_thumbnail: String,
    /// 0 disables the refresh scheduler.
    pub refresh_secs: u64,
    pub http_timeout_secs: Option<u64>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self::default_seed()
    }
}

impl IngestConfig {
    /// The three sheets the site publishes, one per category.
    pub fn default_seed() -> Self {
        let sheet = |gid: &str| format!("{SHEET_BASE}?gid={gid}&single=true&output=tsv");
        Self {
            sources: vec![
                SourceEntry {
                    category: Category::ConGiap,
                    url: sheet("969575685"),
                },
                SourceEntry {
                    category: Category::CungHoangDao,
                    url: sheet("1252389482"),
                },
                SourceEntry {
                    category: Category::Quiz,
                    url: sheet("2126276661"),
                },
            ],
            max_numbered_fields: DEFAULT_MAX_NUMBERED_FIELDS,
            placeholder_thumbnail: DEFAULT_PLACEHOLDER_THUMBNAIL.to_string(),
            refresh_secs: 0,
            http_timeout_secs: None,
        }
    }

    pub fn schema(&self) -> ColumnSchema {
        ColumnSchema::default()
            .with_max_numbered_fields(self.max_numbered_fields)
            .with_placeholder_thumbnail(self.placeholder_thumbnail.clone())
    }

    /// One HTTP provider per configured source, sharing a client and schema.
    pub fn build_providers(&self) -> Result<Vec<Box<dyn SheetProvider>>> {
        let client = build_client(self.http_timeout_secs.map(Duration::from_secs))?;
        let schema = Arc::new(self.schema());
        Ok(self
            .sources
            .iter()
            .map(|s| {
                Box::new(
                    SheetTsvProvider::from_url(s.category, s.url.clone(), client.clone())
                        .with_schema(schema.clone()),
                ) as Box<dyn SheetProvider>
            })
            .collect())
    }
}

#[derive(Deserialize)]
struct RawConfig {
    #[serde(default)]
    sources: Vec<RawSource>,
    max_numbered_fields: Option<usize>,
    placeholder_thumbnail: Option<String>,
    refresh_secs: Option<u64>,
    http_timeout_secs: Option<u64>,
}

#[derive(Deserialize)]
struct RawSource {
    category: String,
    url: String,
}

/// Load from an explicit path. Supports TOML or JSON.
pub fn load_sources_from(path: &Path) -> Result<IngestConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading quiz sources from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_config(&content, ext.as_str())
}

/// Load using env var + fallbacks:
/// 1) $QUIZ_SOURCES_PATH
/// 2) config/sources.toml
/// 3) config/sources.json
/// 4) built-in seed
pub fn load_sources_default() -> Result<IngestConfig> {
    if let Ok(p) = std::env::var(ENV_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_sources_from(&pb);
        } else {
            return Err(anyhow!("{ENV_PATH} points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from("config/sources.toml");
    if toml_p.exists() {
        return load_sources_from(&toml_p);
    }
    let json_p = PathBuf::from("config/sources.json");
    if json_p.exists() {
        return load_sources_from(&json_p);
    }
    Ok(IngestConfig::default_seed())
}

fn parse_config(s: &str, hint_ext: &str) -> Result<IngestConfig> {
    let raw: RawConfig = if hint_ext == "json" {
        serde_json::from_str(s).context("parsing quiz sources json")?
    } else {
        match toml::from_str(s) {
            Ok(v) => v,
            Err(toml_err) => serde_json::from_str(s)
                .map_err(|_| anyhow!(toml_err))
                .context("parsing quiz sources")?,
        }
    };
    finish(raw)
}

fn finish(raw: RawConfig) -> Result<IngestConfig> {
    let seed = IngestConfig::default_seed();

    let mut sources = Vec::with_capacity(raw.sources.len());
    for src in raw.sources {
        let category = Category::from_label(&src.category)
            .ok_or_else(|| anyhow!("unknown category in quiz sources: {:?}", src.category))?;
        let url = src.url.trim();
        if url.is_empty() {
            tracing::warn!(category = %category, "quiz source without url skipped");
            continue;
        }
        sources.push(SourceEntry {
            category,
            url: url.to_string(),
        });
    }

    Ok(IngestConfig {
        sources,
        max_numbered_fields: raw
            .max_numbered_fields
            .filter(|n| *n > 0)
            .unwrap_or(seed.max_numbered_fields),
        placeholder_thumbnail: raw
            .placeholder_thumbnail
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(seed.placeholder_thumbnail),
        refresh_secs: raw.refresh_secs.unwrap_or(seed.refresh_secs),
        http_timeout_secs: raw.http_timeout_secs.filter(|n| *n > 0),
    })
}
