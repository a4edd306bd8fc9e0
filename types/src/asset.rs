//! Asset manifest and settlement outcomes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where an asset lives. Classified once so fetchers can dispatch cheaply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocatorKind {
    Http,
    File,
}

/// A single resource locator: an `http(s)` URL, a `file://` URL, or a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetLocator(String);

impl AssetLocator {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().trim().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn kind(&self) -> LocatorKind {
        let lower = self.0.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            LocatorKind::Http
        } else {
            LocatorKind::File
        }
    }
}

impl fmt::Display for AssetLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered set of assets that must settle before the reveal. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetManifest(Vec<AssetLocator>);

impl AssetManifest {
    /// Build a manifest. Duplicate locators are kept: each entry is one slot.
    pub fn new<I, S>(locators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            locators
                .into_iter()
                .map(AssetLocator::new)
                .filter(|locator| !locator.as_str().is_empty())
                .collect(),
        )
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, slot: usize) -> Option<&AssetLocator> {
        self.0.get(slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetLocator> {
        self.0.iter()
    }
}

/// Final outcome of one retrieval. Both variants count as settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SettleOutcome {
    Loaded { bytes: u64 },
    Failed { reason: String },
}

impl SettleOutcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Settlement event for a manifest slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub slot: usize,
    pub outcome: SettleOutcome,
}
