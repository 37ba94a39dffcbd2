//! Stage lifecycle logging.
//!
//! The orchestrator reports stage boundaries through an injected
//! [`LifecycleSink`] rather than a process-wide logger, so tests can swap in
//! a [`CollectingLifecycleSink`] and assert on the exact entry sequence.

mod sink;

pub use sink::{
    completed_banner, error_detail, started_banner, CollectingLifecycleSink, LifecycleEntry,
    LifecycleKind, LifecycleLevel, LifecycleSink, NoOpLifecycleSink, TracingLifecycleSink,
};
