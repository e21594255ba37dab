mod lock;
mod text;

pub use lock::lock;
pub use text::preview;
