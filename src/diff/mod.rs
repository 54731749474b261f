//! Snapshot differ: outer-join two snapshots by holding name and rank by
//! today's weight.
//!
//! Holdings that exist on only one side are kept with the missing weight set
//! to `0.0`, so new entrants and dropped names show up in the report.

use std::collections::HashMap;

use log::{debug, warn};

use crate::domain::{DiffRow, RankedTable, RawWeight, Snapshot};
use crate::error::Unavailable;

/// Join `today` and `yesterday` and sort by today's weight, heaviest first.
///
/// Merge order is today's file order followed by yesterday-only names in
/// yesterday's file order; the sort is stable with respect to it. The returned
/// table is not truncated.
pub fn diff(today: &Snapshot, yesterday: &Snapshot) -> Result<RankedTable, Unavailable> {
    if today.is_empty() || yesterday.is_empty() {
        return Err(Unavailable::Empty);
    }

    let mut index: HashMap<&str, usize> = HashMap::with_capacity(today.len() + yesterday.len());
    let mut merged: Vec<(&str, Option<&RawWeight>, Option<&RawWeight>)> = Vec::new();

    for h in &today.holdings {
        if index.contains_key(h.name.as_str()) {
            warn!("Duplicate holding '{}' in {} snapshot; keeping the first.", h.name, today.date);
            continue;
        }
        index.insert(h.name.as_str(), merged.len());
        merged.push((h.name.as_str(), Some(&h.weight), None));
    }

    for h in &yesterday.holdings {
        match index.get(h.name.as_str()).copied() {
            Some(i) => {
                let slot = &mut merged[i].2;
                if slot.is_some() {
                    warn!("Duplicate holding '{}' in {} snapshot; keeping the first.", h.name, yesterday.date);
                } else {
                    *slot = Some(&h.weight);
                }
            }
            None => {
                index.insert(h.name.as_str(), merged.len());
                merged.push((h.name.as_str(), None, Some(&h.weight)));
            }
        }
    }

    let mut rows: Vec<DiffRow> = merged
        .into_iter()
        .map(|(name, t, y)| {
            let today = t.map(coerce).unwrap_or(0.0);
            let yesterday = y.map(coerce).unwrap_or(0.0);
            DiffRow {
                name: name.to_string(),
                today,
                yesterday,
                delta: today - yesterday,
            }
        })
        .collect();

    // `sort_by` is stable, so ties keep merge order.
    rows.sort_by(|a, b| b.today.partial_cmp(&a.today).unwrap_or(std::cmp::Ordering::Equal));

    debug!(
        "Diffed {} ({} holdings) against {} ({} holdings): {} rows.",
        today.date,
        today.len(),
        yesterday.date,
        yesterday.len(),
        rows.len()
    );

    Ok(RankedTable {
        today_date: today.date,
        yesterday_date: yesterday.date,
        rows,
    })
}

fn coerce(raw: &RawWeight) -> f64 {
    match raw {
        RawWeight::Number(v) if v.is_finite() => *v,
        RawWeight::Number(_) | RawWeight::Blank => 0.0,
        RawWeight::Text(s) => coerce_weight(s),
    }
}

/// Parse a weight cell, falling back to `0.0` for anything that is not a
/// finite number.
///
/// A trailing percent sign is accepted; any comma makes the cell
/// unparsable (`8,91` is `0.0`, never `891`).
pub fn coerce_weight(raw: &str) -> f64 {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Round to two decimals, the precision every report shows.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
