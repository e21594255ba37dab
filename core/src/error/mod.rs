#[allow(clippy::module_inception)]
pub mod error;
pub mod service;

pub use error::CliError;
pub use service::TaskServiceError;
