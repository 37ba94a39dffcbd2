//! Observability utilities.

mod logging;
mod timer;

pub use logging::{build_filter, init_logging, open_log_file};
pub use timer::SpanTimer;
