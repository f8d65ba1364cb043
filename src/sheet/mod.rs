//! Sheet transport: where the raw table comes from and how it is decoded.

use async_trait::async_trait;
use reqwest::Url;

use crate::constants;
use crate::error::{AromaError, Result};
use crate::types::RawTable;

pub mod file;
pub mod google;

pub use file::FileSheetSource;
pub use google::GoogleSheetSource;

/// Produces a fresh raw table on every call. Implementations never cache.
#[async_trait]
pub trait SheetSource: Send + Sync {
    async fn fetch(&self) -> Result<RawTable>;

    /// Human-readable origin, used in logs.
    fn describe(&self) -> String;
}

/// A single tab of a Google spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRef {
    pub id: String,
    pub gid: String,
}

impl SheetRef {
    pub fn new(id: &str, gid: &str) -> Self {
        let gid = gid.trim();
        Self {
            id: id.trim().to_string(),
            gid: if gid.is_empty() {
                constants::DEFAULT_GID.to_string()
            } else {
                gid.to_string()
            },
        }
    }

    /// Parses a browser URL such as
    /// `https://docs.google.com/spreadsheets/d/<id>/edit?gid=0#gid=0`.
    /// The id is the path segment after `d`; `gid` defaults to `"0"`.
    pub fn from_url(url: &str) -> Result<Self> {
        let parsed = Url::parse(url.trim())
            .map_err(|e| AromaError::InvalidSheetUrl(format!("{}: {}", url, e)))?;

        let segments: Vec<&str> = parsed
            .path_segments()
            .map(|s| s.collect())
            .unwrap_or_default();
        let id = segments
            .iter()
            .position(|s| *s == "d")
            .and_then(|i| segments.get(i + 1))
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                AromaError::InvalidSheetUrl(format!("{}: no spreadsheet id after /d/", url))
            })?;

        let gid = parsed
            .query_pairs()
            .find(|(k, _)| k == "gid")
            .map(|(_, v)| v.into_owned())
            .unwrap_or_default();

        Ok(Self::new(id, &gid))
    }

    pub fn export_url(&self) -> String {
        self.export_url_at(constants::GOOGLE_SHEETS_BASE)
    }

    /// Export URL under another host, e.g. a local mirror of the sheets API.
    pub fn export_url_at(&self, base: &str) -> String {
        format!(
            "{}/{}/export?format=csv&gid={}",
            base.trim_end_matches('/'),
            self.id,
            self.gid
        )
    }
}

/// Decodes CSV text into a raw table. The first record is the header row;
/// ragged rows are tolerated and squared up by [`RawTable::new`].
pub fn parse_csv(text: &str) -> Result<RawTable> {
    // Strip UTF-8 BOM if present
    let text = text.trim_start_matches('\u{FEFF}');

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    tracing::debug!(
        columns = headers.len(),
        rows = rows.len(),
        "decoded sheet CSV"
    );
    Ok(RawTable::new(headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_url_with_gid() {
        let sheet = SheetRef::from_url(
            "https://docs.google.com/spreadsheets/d/1_f7IZpy7AfjO2gw/edit?gid=123#gid=123",
        )
        .unwrap();
        assert_eq!(sheet.id, "1_f7IZpy7AfjO2gw");
        assert_eq!(sheet.gid, "123");
        assert_eq!(
            sheet.export_url(),
            "https://docs.google.com/spreadsheets/d/1_f7IZpy7AfjO2gw/export?format=csv&gid=123"
        );
    }

    #[test]
    fn test_from_url_without_gid_defaults_to_zero() {
        let sheet = SheetRef::from_url("https://docs.google.com/spreadsheets/d/abc/edit").unwrap();
        assert_eq!(sheet, SheetRef::new("abc", "0"));
    }

    #[test]
    fn test_from_url_without_id_is_rejected() {
        assert!(matches!(
            SheetRef::from_url("https://docs.google.com/spreadsheets/"),
            Err(AromaError::InvalidSheetUrl(_))
        ));
        assert!(matches!(
            SheetRef::from_url("not a url"),
            Err(AromaError::InvalidSheetUrl(_))
        ));
    }

    #[test]
    fn test_parse_csv_quoted_and_ragged() {
        let text = "\u{FEFF}Название,Цена,\"Иван, Петров\"\n\"Al Rehab, Choco\",\"350,00\",5\nShort\n";
        let table = parse_csv(text).unwrap();
        assert_eq!(table.headers(), ["Название", "Цена", "Иван, Петров"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows()[0], ["Al Rehab, Choco", "350,00", "5"]);
        assert_eq!(table.rows()[1], ["Short", "", ""]);
    }

    #[test]
    fn test_parse_csv_empty_input() {
        let table = parse_csv("").unwrap();
        assert_eq!(table.column_count(), 0);
        assert_eq!(table.row_count(), 0);
    }
}
