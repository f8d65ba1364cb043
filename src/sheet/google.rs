use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::info;

use super::{parse_csv, SheetRef, SheetSource};
use crate::constants;
use crate::error::Result;
use crate::types::RawTable;

/// Fetches the CSV export of a Google sheet tab. One GET per call, no retries.
#[derive(Clone)]
pub struct GoogleSheetSource {
    client: Client,
    sheet: SheetRef,
    base_url: String,
}

impl GoogleSheetSource {
    pub fn new(sheet: SheetRef, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("aroma_web/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            sheet,
            base_url: constants::GOOGLE_SHEETS_BASE.to_string(),
        })
    }

    /// Serve exports from `base_url` instead of docs.google.com.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn export_url(&self) -> String {
        self.sheet.export_url_at(&self.base_url)
    }
}

#[async_trait]
impl SheetSource for GoogleSheetSource {
    async fn fetch(&self) -> Result<RawTable> {
        let started = Instant::now();
        let url = self.export_url();

        let response = self.client.get(&url).send().await?.error_for_status()?;
        let text = response.text().await?;
        let table = parse_csv(&text)?;

        info!(
            sheet_id = %self.sheet.id,
            gid = %self.sheet.gid,
            bytes = text.len(),
            rows = table.row_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "fetched sheet export"
        );
        Ok(table)
    }

    fn describe(&self) -> String {
        self.export_url()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AromaError;
    use axum::{routing::get, Router};

    /// Serves a fake export endpoint on an ephemeral local port.
    async fn spawn_export_server() -> String {
        let app = Router::new()
            .route(
                "/ok/export",
                get(|| async { "\u{FEFF}Название,Цена,Набрано\nAmber,\"120,5\",40\n" }),
            )
            .route(
                "/slow/export",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "Название\nAmber\n"
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn source(base: &str, id: &str) -> GoogleSheetSource {
        GoogleSheetSource::new(SheetRef::new(id, "0"), Duration::from_secs(1))
            .unwrap()
            .with_base_url(base)
    }

    #[tokio::test]
    async fn test_fetch_decodes_export() {
        let base = spawn_export_server().await;
        let table = source(&base, "ok").fetch().await.unwrap();
        assert_eq!(table.headers(), ["Название", "Цена", "Набрано"]);
        assert_eq!(table.rows()[0], ["Amber", "120,5", "40"]);
    }

    #[tokio::test]
    async fn test_fetch_not_found_is_fetch_failure() {
        let base = spawn_export_server().await;
        let err = source(&base, "missing").fetch().await.unwrap_err();
        assert!(matches!(err, AromaError::Http(_)));
        assert!(err.is_fetch_failure());
    }

    #[tokio::test]
    async fn test_fetch_timeout_is_fetch_failure() {
        let base = spawn_export_server().await;
        let err = source(&base, "slow").fetch().await.unwrap_err();
        assert!(matches!(err, AromaError::Http(ref e) if e.is_timeout()));
        assert!(err.is_fetch_failure());
    }

    #[test]
    fn test_describe_uses_base_url() {
        let src = source("http://127.0.0.1:9/", "abc");
        assert_eq!(src.describe(), "http://127.0.0.1:9/abc/export?format=csv&gid=0");
        let live = GoogleSheetSource::new(SheetRef::new("abc", "3"), Duration::from_secs(1)).unwrap();
        assert_eq!(
            live.describe(),
            "https://docs.google.com/spreadsheets/d/abc/export?format=csv&gid=3"
        );
    }
}
