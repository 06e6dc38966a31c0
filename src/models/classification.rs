use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Sector and holding-horizon group for one ticker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub sector: String,
    pub group: String,
}

impl Classification {
    pub fn new(sector: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            sector: sector.into(),
            group: group.into(),
        }
    }
}

/// Reference data mapping tickers to their classification.
///
/// Supplied per request by the caller; nothing in the crate holds a global table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassificationMap(HashMap<String, Classification>);

impl ClassificationMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ticker: impl Into<String>, classification: Classification) {
        self.0.insert(ticker.into(), classification);
    }

    pub fn get(&self, ticker: &str) -> Option<&Classification> {
        self.0.get(ticker)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Classification)> for ClassificationMap {
    fn from_iter<I: IntoIterator<Item = (String, Classification)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Portfolio weight summed per sector and per group (fractions).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorBreakdown {
    pub by_sector: BTreeMap<String, f64>,
    pub by_group: BTreeMap<String, f64>,
    /// Tickers with no entry in the classification map
    pub unclassified: Vec<String>,
}
