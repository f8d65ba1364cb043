//! Per-request pipeline: raw sheet → typed records → the rows one page shows.

pub mod coerce;
pub mod normalize;
pub mod select;

pub use normalize::{normalize_header, HeaderIndex, Normalizer};
pub use select::{select, Selection};

use std::time::Instant;
use tracing::info;

use crate::config::{Config, ViewConfig};
use crate::error::Result;
use crate::sheet::SheetSource;
use crate::types::{DisplayMode, PageView, RawTable};

/// Stateless between requests; holds only deployment settings.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    normalizer: Normalizer,
    view: ViewConfig,
}

impl Pipeline {
    pub fn new(config: &Config) -> Self {
        Self {
            normalizer: Normalizer::new(config.columns.clone()),
            view: config.view.clone(),
        }
    }

    /// Normalizes and selects. `user` is echoed back untouched.
    pub fn build_page(&self, raw: &RawTable, user: &str, mode: DisplayMode) -> Result<PageView> {
        let records = self.normalizer.normalize(raw, user)?;
        let total = records.len();
        let Selection { aromas, order_tag } = select(records, mode, &self.view);

        info!(
            mode = mode.as_str(),
            total,
            shown = aromas.len(),
            order_tag = %order_tag,
            "built page"
        );

        Ok(PageView {
            aromas,
            user_name: user.to_string(),
            mode,
            order_tag,
        })
    }

    /// Fetches a fresh table from `source` and builds the page from it.
    pub async fn run(
        &self,
        source: &dyn SheetSource,
        user: &str,
        mode: DisplayMode,
    ) -> Result<PageView> {
        let started = Instant::now();
        let raw = source.fetch().await?;
        let page = self.build_page(&raw, user, mode)?;
        tracing::debug!(
            source = %source.describe(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "pipeline finished"
        );
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AromaError;

    fn raw() -> RawTable {
        let headers = ["Название", "Цена", "Olga", "Набрано", "Осталось набрать"];
        let rows = [
            ["Amber", "120", "", "30", "70"],
            ["Al Rehab Choco Musk", "350,00 ₸", "5", "95", "5"],
        ];
        RawTable::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_build_page_echoes_raw_user() {
        let page = Pipeline::default()
            .build_page(&raw(), "  OLGA ", DisplayMode::Mine)
            .unwrap();
        assert_eq!(page.user_name, "  OLGA ");
        assert_eq!(page.mode, DisplayMode::Mine);
        assert_eq!(page.aromas.len(), 1);
        assert_eq!(page.aromas[0].name, "Al Rehab Choco Musk");
        assert_eq!(page.aromas[0].price, 350.0);
        assert_eq!(page.order_tag, "#парфюм2 #добор");
    }

    #[test]
    fn test_build_page_plan_keeps_reorder_tag() {
        let page = Pipeline::default()
            .build_page(&raw(), "olga", DisplayMode::Plan)
            .unwrap();
        assert!(page.aromas.is_empty());
        assert_eq!(page.order_tag, "#парфюм2 #добор");
    }

    #[test]
    fn test_build_page_without_participant() {
        let page = Pipeline::default()
            .build_page(&raw(), "", DisplayMode::All)
            .unwrap();
        assert_eq!(page.aromas.len(), 2);
        assert_eq!(page.order_tag, "#парфюм2");
    }

    #[test]
    fn test_build_page_uses_config() {
        let mut config = Config::default();
        config.view.order_tag = "#custom".to_string();
        let page = Pipeline::new(&config)
            .build_page(&raw(), "", DisplayMode::All)
            .unwrap();
        assert_eq!(page.order_tag, "#custom");
    }

    #[test]
    fn test_build_page_schema_error() {
        let table = RawTable::new(vec!["Цена".to_string()], vec![vec!["1".to_string()]]);
        let err = Pipeline::default()
            .build_page(&table, "", DisplayMode::All)
            .unwrap_err();
        assert!(matches!(err, AromaError::NameColumnNotFound));
    }
}
