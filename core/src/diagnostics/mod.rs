//! Best-effort diagnostic events sent to an external log sink.
//!
//! Emitting never fails the originating operation. Delivery errors are
//! logged at debug level and the event is dropped.

mod event;
mod file_sink;
mod writer;

pub use event::DiagnosticEvent;
pub use file_sink::JsonlFileSink;
pub use writer::{start_diagnostics, DiagnosticSink, DiagnosticsTx};
