use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "heic", "mp4", "mov", "avi", "mkv"];

/// Date tags Immich reads a capture date from.
pub const CANONICAL_DATE_TAGS: &[&str] = &[
    "SubSecDateTimeOriginal",
    "DateTimeOriginal",
    "SubSecCreateDate",
    "CreationDate",
    "CreateDate",
    "SubSecMediaCreateDate",
    "MediaCreateDate",
    "DateTimeCreated",
    "SourceImageCreateTime",
];

/// Substitute date sources, most preferred first.
pub const FALLBACK_DATE_TAGS: &[&str] = &[
    "GPSDateTime",
    "GPSDateStamp",
    "SubSecModifyDate",
    "ModifyDate",
    "FileModifyDate",
];

pub const DEFAULT_TARGET_TAG: &str = "SubSecDateTimeOriginal";

/// Settings that take comma-separated lists from `EXFIX__*` variables.
const LIST_KEYS: &[&str] = &["scan.extensions", "scan.exclude", "tags.canonical", "tags.fallback"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scan: ScanConfig,
    pub tags: TagConfig,
    pub exiftool: ExiftoolConfig,
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub extensions: Vec<String>,
    pub exclude: Vec<String>,
    pub follow_links: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: to_strings(SUPPORTED_EXTENSIONS),
            exclude: Vec::new(),
            follow_links: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TagConfig {
    pub canonical: Vec<String>,
    pub fallback: Vec<String>,
    pub target: String,
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            canonical: to_strings(CANONICAL_DATE_TAGS),
            fallback: to_strings(FALLBACK_DATE_TAGS),
            target: DEFAULT_TARGET_TAG.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExiftoolConfig {
    pub program: String,
    /// Per-invocation limit; 0 waits forever.
    pub timeout_secs: u64,
}

impl Default for ExiftoolConfig {
    fn default() -> Self {
        Self {
            program: "exiftool".to_string(),
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub workers: usize,
    pub dry_run: bool,
    pub backup: bool,
    pub verbose: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            dry_run: false,
            backup: false,
            verbose: false,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.batch.workers == 0 {
            bail!("batch.workers must be at least 1");
        }
        if self.tags.target.trim().is_empty() {
            bail!("tags.target must name a tag");
        }
        if self.scan.extensions.is_empty() {
            bail!("scan.extensions must not be empty");
        }
        Ok(())
    }
}

pub fn load(path: Option<&str>) -> anyhow::Result<AppConfig> {
    let mut settings = config::Config::builder();
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    } else {
        settings = settings.add_source(config::File::with_name("config/exfix").required(false));
    }
    let mut env = config::Environment::with_prefix("EXFIX")
        .separator("__")
        .try_parsing(true)
        .list_separator(",");
    for key in LIST_KEYS {
        env = env.with_list_parse_key(key);
    }
    settings = settings.add_source(env);
    let cfg = settings.build().context("reading configuration")?;
    let app: AppConfig = cfg.try_deserialize().context("parsing configuration")?;
    app.validate()?;
    Ok(app)
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
