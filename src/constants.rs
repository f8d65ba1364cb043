/// Default values for a deployment. Every one of them can be overridden from
/// `config.toml`, so several order sheets can share one binary.

// Header substrings that identify the aroma name column (matched lowercase)
pub const NAME_MARKERS: [&str; 2] = ["название", "name"];

// Exact headers maintained by the organizer
pub const COLLECTED_HEADER: &str = "Набрано";
pub const REMAINING_HEADER: &str = "Осталось набрать";

// Hashtags attached to the participant's Telegram message
pub const ORDER_TAG: &str = "#парфюм2";
pub const REORDER_TAG: &str = "#парфюм2 #добор";

// First item of the perfume section of the catalog
pub const PERFUME_SECTION_ANCHOR: &str = "Al Rehab Choco Musk";

pub const DEFAULT_GID: &str = "0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

pub const GOOGLE_SHEETS_BASE: &str = "https://docs.google.com/spreadsheets/d";
