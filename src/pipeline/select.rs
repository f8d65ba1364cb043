use crate::config::ViewConfig;
use crate::types::{AromaRecord, DisplayMode};

/// Rows to display plus the message tag for the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub aromas: Vec<AromaRecord>,
    pub order_tag: String,
}

/// Reorder tag as soon as anyone has a reservation in `records`. Callers pass
/// the full record set so the tag does not depend on the display mode.
pub fn order_tag<'a>(records: &[AromaRecord], view: &'a ViewConfig) -> &'a str {
    if records.iter().any(|r| r.ordered_ml > 0) {
        &view.reorder_tag
    } else {
        &view.order_tag
    }
}

/// Index of the first record whose name contains `anchor`, ignoring case.
pub fn section_start(records: &[AromaRecord], anchor: &str) -> Option<usize> {
    let anchor = anchor.to_lowercase();
    records
        .iter()
        .position(|r| r.name.to_lowercase().contains(&anchor))
}

pub fn select(records: Vec<AromaRecord>, mode: DisplayMode, view: &ViewConfig) -> Selection {
    let order_tag = order_tag(&records, view).to_string();

    let aromas = match mode {
        DisplayMode::All => records,
        DisplayMode::Mine => records.into_iter().filter(|r| r.ordered_ml > 0).collect(),
        // Placeholder until planned orders exist in the sheet
        DisplayMode::Plan => Vec::new(),
        DisplayMode::PerfumeSection => {
            match section_start(&records, &view.perfume_section_anchor) {
                Some(start) => records.into_iter().skip(start).collect(),
                None => records,
            }
        }
    };

    Selection { aromas, order_tag }
}
