use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AromaError {
    /// The sheet has no header containing any name marker. Fatal for the request.
    #[error("name column not found")]
    NameColumnNotFound,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV decoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid sheet URL: {0}")]
    InvalidSheetUrl(String),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Template rendering failed: {0}")]
    Template(#[from] askama::Error),
}

impl AromaError {
    /// Upstream fetch problems: the sheet could not be retrieved or decoded.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, AromaError::Http(_) | AromaError::Csv(_))
    }

    pub fn status_code(&self) -> StatusCode {
        if self.is_fetch_failure() {
            StatusCode::BAD_GATEWAY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AromaError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        let status = self.status_code();
        let title = if self.is_fetch_failure() {
            "Не удалось загрузить таблицу"
        } else {
            "Ошибка обработки таблицы"
        };
        let body = format!(
            "<h1>{}</h1><p>{}</p>",
            title,
            escape_html(&self.to_string())
        );
        (status, Html(body)).into_response()
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub type Result<T> = std::result::Result<T, AromaError>;
