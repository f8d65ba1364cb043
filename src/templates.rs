use askama::Template;

use crate::types::{AromaRecord, DisplayMode, PageView};

const TABS: [(DisplayMode, &str); 4] = [
    (DisplayMode::All, "Все ароматы"),
    (DisplayMode::Mine, "Моё"),
    (DisplayMode::PerfumeSection, "Парфюм"),
    (DisplayMode::Plan, "План заказа"),
];

pub struct ModeTab {
    pub value: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// A record with its numbers formatted for display.
pub struct AromaRow {
    pub name: String,
    pub ordered_ml: u32,
    pub price: String,
    pub total_collected: u32,
    pub remaining_ml: u32,
    pub progress_percent: u32,
}

impl From<&AromaRecord> for AromaRow {
    fn from(record: &AromaRecord) -> Self {
        Self {
            name: record.name.clone(),
            ordered_ml: record.ordered_ml,
            price: format_price(record.price),
            total_collected: record.total_collected,
            remaining_ml: record.remaining_ml,
            progress_percent: progress_percent(record.total_collected, record.remaining_ml),
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub rows: Vec<AromaRow>,
    pub user_name: String,
    pub mode: &'static str,
    pub order_tag: String,
    pub tabs: Vec<ModeTab>,
}

impl From<&PageView> for IndexTemplate {
    fn from(page: &PageView) -> Self {
        Self {
            rows: page.aromas.iter().map(AromaRow::from).collect(),
            user_name: page.user_name.clone(),
            mode: page.mode.as_str(),
            order_tag: page.order_tag.clone(),
            tabs: TABS
                .iter()
                .map(|&(mode, label)| ModeTab {
                    value: mode.as_str(),
                    label,
                    active: mode == page.mode,
                })
                .collect(),
        }
    }
}

/// Whole prices without decimals, everything else with two.
pub fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("{:.0}", price)
    } else {
        format!("{:.2}", price)
    }
}

/// Share of the bottle already collected, 0 when the sheet has no progress.
pub fn progress_percent(collected: u32, remaining: u32) -> u32 {
    let total = u64::from(collected) + u64::from(remaining);
    if total == 0 {
        return 0;
    }
    (u64::from(collected) * 100 / total) as u32
}
