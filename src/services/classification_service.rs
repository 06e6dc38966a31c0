use tracing::debug;

use crate::models::{ClassificationMap, Holding, SectorBreakdown};

pub const UNKNOWN_CLASSIFICATION: &str = "Unknown";

/// Sum holding weights per sector and per group using caller-supplied tags.
///
/// Tickers missing from `map` are reported under `"Unknown"` for both sector and
/// group and listed in `unclassified`.
pub fn sector_breakdown(holdings: &[Holding], map: &ClassificationMap) -> SectorBreakdown {
    let mut breakdown = SectorBreakdown::default();

    for holding in holdings {
        let (sector, group) = match map.get(&holding.ticker) {
            Some(c) => (c.sector.clone(), c.group.clone()),
            None => {
                breakdown.unclassified.push(holding.ticker.clone());
                (UNKNOWN_CLASSIFICATION.to_string(), UNKNOWN_CLASSIFICATION.to_string())
            }
        };
        *breakdown.by_sector.entry(sector).or_insert(0.0) += holding.weight;
        *breakdown.by_group.entry(group).or_insert(0.0) += holding.weight;
    }

    debug!(
        "Classified {} holdings into {} sectors ({} unclassified)",
        holdings.len(),
        breakdown.by_sector.len(),
        breakdown.unclassified.len()
    );

    breakdown
}
