use askama::Template;
use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::error::Result;
use crate::pipeline::Pipeline;
use crate::sheet::SheetSource;
use crate::templates::IndexTemplate;
use crate::types::DisplayMode;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub source: Arc<dyn SheetSource>,
}

impl AppState {
    pub fn new(pipeline: Pipeline, source: Arc<dyn SheetSource>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            source,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct IndexParams {
    pub mode: Option<String>,
    pub user: Option<String>,
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "aroma_web",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// The order sheet page. Fetches the sheet on every request.
async fn index(
    State(state): State<AppState>,
    Query(params): Query<IndexParams>,
) -> Result<Html<String>> {
    let mode = DisplayMode::parse(params.mode.as_deref().unwrap_or_default());
    let user = params.user.unwrap_or_default();

    let page = state.pipeline.run(state.source.as_ref(), &user, mode).await?;
    let html = IndexTemplate::from(&page).render()?;
    Ok(Html(html))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(state: AppState, port: u16) -> Result<()> {
    let app = create_router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(%addr, "HTTP server listening (visit http://127.0.0.1:{})", port);
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AromaError;
    use crate::types::RawTable;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    struct StaticSheet(Vec<&'static str>, Vec<Vec<&'static str>>);

    #[async_trait]
    impl SheetSource for StaticSheet {
        async fn fetch(&self) -> Result<RawTable> {
            Ok(RawTable::new(
                self.0.iter().map(|h| h.to_string()).collect(),
                self.1
                    .iter()
                    .map(|r| r.iter().map(|c| c.to_string()).collect())
                    .collect(),
            ))
        }

        fn describe(&self) -> String {
            "static".to_string()
        }
    }

    struct BrokenSheet;

    #[async_trait]
    impl SheetSource for BrokenSheet {
        async fn fetch(&self) -> Result<RawTable> {
            let err = csv::ReaderBuilder::new()
                .from_reader(&[0xff, 0xfe, b'\n', b'a'][..])
                .headers()
                .map(|_| ())
                .unwrap_err();
            Err(AromaError::from(err))
        }

        fn describe(&self) -> String {
            "broken".to_string()
        }
    }

    fn app(source: impl SheetSource + 'static) -> Router {
        create_router(AppState::new(Pipeline::default(), Arc::new(source)))
    }

    async fn get_page(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    fn catalog() -> StaticSheet {
        StaticSheet(
            vec!["Название", "Цена", "Olga", "Набрано", "Осталось набрать"],
            vec![
                vec!["Amber", "120", "", "30", "70"],
                vec!["Oud Royal", "350,00 ₸", "10", "90", "10"],
            ],
        )
    }

    #[tokio::test]
    async fn test_index_renders_all_rows() {
        let (status, body) = get_page(app(catalog()), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Amber"));
        assert!(body.contains("Oud Royal"));
        assert!(body.contains("#парфюм2"));
    }

    #[tokio::test]
    async fn test_index_mine_filters_rows() {
        let (status, body) = get_page(app(catalog()), "/?mode=mine&user=olga").await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body.contains("Amber"));
        assert!(body.contains("Oud Royal"));
        assert!(body.contains("#парфюм2 #добор"));
    }

    #[tokio::test]
    async fn test_index_missing_name_column_is_500() {
        let sheet = StaticSheet(vec!["Цена"], vec![vec!["100"]]);
        let (status, body) = get_page(app(sheet), "/").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("name column not found"));
    }

    #[tokio::test]
    async fn test_index_fetch_failure_is_502() {
        let (status, _) = get_page(app(BrokenSheet), "/").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_page(app(catalog()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("healthy"));
    }
}
