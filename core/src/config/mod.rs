mod load;
mod types;

pub use load::{
    apply_env_overrides, get_kanban_data_dir, load_default, load_file, API_URL_ENV, LOG_LEVEL_ENV,
};
pub use types::{
    ApiConfig, AppConfig, BoardConfig, DiagnosticsConfig, LoggingConfig, PaginationStyle,
    TuiConfig,
};
