mod error;
mod http_client;

pub use error::{HttpError, HttpErrorKind};
pub use http_client::HttpTaskService;
