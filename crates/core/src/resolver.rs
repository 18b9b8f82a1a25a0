//! Decides what to do with a file given its tags.
//!
//! Canonical tags are checked before any fallback, and within the fallback
//! list the first present entry wins.

use crate::config::TagConfig;
use crate::models::{Outcome, TagSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPolicy {
    canonical: Vec<String>,
    fallback: Vec<String>,
    target: String,
}

impl TagPolicy {
    pub fn new(canonical: Vec<String>, fallback: Vec<String>, target: impl Into<String>) -> Self {
        Self {
            canonical,
            fallback,
            target: target.into(),
        }
    }

    /// Tag written when a repair is applied.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn resolve(&self, tags: &TagSet) -> Outcome {
        if tags.is_empty() {
            return Outcome::ReadFailed;
        }
        if self.canonical.iter().any(|t| tags.contains_key(t)) {
            return Outcome::NoActionNeeded;
        }
        self.fallback
            .iter()
            .find_map(|t| {
                tags.get(t).map(|value| Outcome::Repairable {
                    tag: t.clone(),
                    value: value.clone(),
                })
            })
            .unwrap_or(Outcome::UnrepairableMissingTag)
    }
}

impl Default for TagPolicy {
    fn default() -> Self {
        Self::from(&TagConfig::default())
    }
}

impl From<&TagConfig> for TagPolicy {
    fn from(cfg: &TagConfig) -> Self {
        Self::new(cfg.canonical.clone(), cfg.fallback.clone(), cfg.target.clone())
    }
}
