use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub board: BoardConfig,

    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,

    #[serde(default)]
    pub tui: TuiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr (suppressed while the board UI owns the screen).
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    #[serde(default = "default_logging_file")]
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "kanban_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Optional directory for log files. If empty or unset, uses OS temp dir.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_file() -> bool {
    true
}

fn default_logging_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: default_logging_file(),
            level: default_logging_level(),
            directory: None,
        }
    }
}

/// Which query parameter carries the page size on list requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaginationStyle {
    /// `_page` + `_per_page`
    #[default]
    PerPage,
    /// `_page` + `_limit`
    Limit,
}

impl PaginationStyle {
    pub fn size_param(self) -> &'static str {
        match self {
            PaginationStyle::PerPage => "_per_page",
            PaginationStyle::Limit => "_limit",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default)]
    pub pagination: PaginationStyle,
}

fn default_api_url() -> String {
    "http://localhost:4000".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_url(),
            timeout_ms: default_timeout_ms(),
            pagination: PaginationStyle::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Tasks per page for every column.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Cached column data counts as fresh for this long.
    #[serde(default = "default_stale_time_ms")]
    pub stale_time_ms: u64,

    /// Unsubscribed cache entries are dropped after this long.
    #[serde(default = "default_gc_time_ms")]
    pub gc_time_ms: u64,

    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Pointer travel (px) before a press turns into a drag.
    #[serde(default = "default_drag_threshold")]
    pub drag_threshold: f64,
}

fn default_page_size() -> u32 {
    4
}

fn default_stale_time_ms() -> u64 {
    30_000
}

fn default_gc_time_ms() -> u64 {
    300_000
}

fn default_search_debounce_ms() -> u64 {
    300
}

fn default_drag_threshold() -> f64 {
    5.0
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            stale_time_ms: default_stale_time_ms(),
            gc_time_ms: default_gc_time_ms(),
            search_debounce_ms: default_search_debounce_ms(),
            drag_threshold: default_drag_threshold(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Log-ingestion URL; events are POSTed there as JSON.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// JSONL file path (or `stdout:`), used when no endpoint is set.
    #[serde(default)]
    pub path: Option<String>,

    /// Events queued beyond this are dropped, never waited on.
    #[serde(default = "default_diagnostics_capacity")]
    pub channel_capacity: usize,
}

fn default_diagnostics_capacity() -> usize {
    256
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            path: None,
            channel_capacity: default_diagnostics_capacity(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuiConfig {
    #[serde(default = "default_update_interval_ms")]
    pub update_interval_ms: u64,

    /// Terminal cells are scaled to pixels before drag geometry is computed.
    #[serde(default = "default_cell_width_px")]
    pub cell_width_px: f64,

    #[serde(default = "default_cell_height_px")]
    pub cell_height_px: f64,
}

fn default_update_interval_ms() -> u64 {
    50
}

fn default_cell_width_px() -> f64 {
    8.0
}

fn default_cell_height_px() -> f64 {
    16.0
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: default_update_interval_ms(),
            cell_width_px: default_cell_width_px(),
            cell_height_px: default_cell_height_px(),
        }
    }
}
