use std::collections::HashMap;
use tracing::{debug, warn};

use super::coerce::{extract_price, to_ml};
use crate::config::ColumnsConfig;
use crate::error::{AromaError, Result};
use crate::types::{AromaRecord, RawTable};

/// Canonical form used to compare headers with participant names: trimmed,
/// lowercase, any run of whitespace (including NBSP) collapsed to one space.
pub fn normalize_header(value: &str) -> String {
    value
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalized header → column position, built once per table.
#[derive(Debug, Clone, Default)]
pub struct HeaderIndex {
    by_name: HashMap<String, usize>,
}

impl HeaderIndex {
    /// When two headers normalize to the same key the later column wins.
    pub fn build(headers: &[String]) -> Self {
        let by_name = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (normalize_header(h), i))
            .collect();
        Self { by_name }
    }

    /// Exact match after normalization; a blank name never matches.
    pub fn lookup(&self, name: &str) -> Option<usize> {
        let key = normalize_header(name);
        if key.is_empty() {
            return None;
        }
        self.by_name.get(&key).copied()
    }
}

/// Position of the first header containing any of `markers`, compared lowercase.
pub fn find_name_column(headers: &[String], markers: &[String]) -> Result<usize> {
    let markers: Vec<String> = markers
        .iter()
        .map(|m| m.trim().to_lowercase())
        .filter(|m| !m.is_empty())
        .collect();

    headers
        .iter()
        .position(|h| {
            let lower = h.to_lowercase();
            markers.iter().any(|m| lower.contains(m.as_str()))
        })
        .ok_or(AromaError::NameColumnNotFound)
}

/// Turns the organizer's sheet into typed records for one participant.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    columns: ColumnsConfig,
}

impl Normalizer {
    pub fn new(columns: ColumnsConfig) -> Self {
        Self { columns }
    }

    pub fn normalize(&self, raw: &RawTable, participant: &str) -> Result<Vec<AromaRecord>> {
        let headers = raw.headers();
        let name_col = find_name_column(headers, &self.columns.name_markers)?;

        let index = HeaderIndex::build(headers);
        let ordered_col = index.lookup(participant);
        if ordered_col.is_none() && !participant.trim().is_empty() {
            debug!(participant, "no column for participant, showing zero reservations");
        }

        let collected_col = raw.column_exact(&self.columns.collected);
        let remaining_col = raw.column_exact(&self.columns.remaining);
        if collected_col.is_none() || remaining_col.is_none() {
            warn!(
                collected = collected_col.is_some(),
                remaining = remaining_col.is_some(),
                "progress columns missing, defaulting to zero"
            );
        }

        let ml_at = |row: &[String], col: Option<usize>| col.map_or(0, |c| to_ml(&row[c]));

        let mut records = Vec::with_capacity(raw.row_count());
        for (line, row) in raw.rows().iter().map(Vec::as_slice).enumerate() {
            let name = row[name_col].trim();
            if name.is_empty() {
                debug!(line, "skipping row without a name");
                continue;
            }

            records.push(AromaRecord {
                name: name.to_string(),
                ordered_ml: ml_at(row, ordered_col),
                price: extract_price(row),
                total_collected: ml_at(row, collected_col),
                remaining_ml: ml_at(row, remaining_col),
            });
        }

        Ok(records)
    }
}
