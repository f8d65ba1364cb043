use serde::Serialize;

/// Sheet contents exactly as exported: headers as written by the organizer and
/// untyped text cells. Every row has one cell per header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Builds a rectangular table. Short rows are padded with blank cells and
    /// cells beyond the last header are dropped.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of the column whose header equals `header` exactly.
    pub fn column_exact(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }
}

/// One catalog line, fully typed. Missing or malformed source cells degrade
/// to zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AromaRecord {
    pub name: String,
    pub ordered_ml: u32,
    pub price: f64,
    pub total_collected: u32,
    pub remaining_ml: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    #[default]
    All,
    Mine,
    Plan,
    PerfumeSection,
}

impl DisplayMode {
    /// Unknown or empty values fall back to `All`.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "mine" => DisplayMode::Mine,
            "plan" => DisplayMode::Plan,
            "perfume_section" => DisplayMode::PerfumeSection,
            _ => DisplayMode::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::All => "all",
            DisplayMode::Mine => "mine",
            DisplayMode::Plan => "plan",
            DisplayMode::PerfumeSection => "perfume_section",
        }
    }
}

/// Everything the page needs after the pipeline ran.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    pub aromas: Vec<AromaRecord>,
    /// Participant as typed in the request, not normalized.
    pub user_name: String,
    pub mode: DisplayMode,
    pub order_tag: String,
}
