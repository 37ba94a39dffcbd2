//! Lifecycle sink trait and implementations.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{error, info};

/// Banner logged when a stage starts.
#[must_use]
pub fn started_banner(stage: &str) -> String {
    format!(">>>>>>>>>> stage {stage} started <<<<<<<<<<")
}

/// Banner logged when a stage completes.
#[must_use]
pub fn completed_banner(stage: &str) -> String {
    format!(">>>>>>>>>> stage {stage} completed <<<<<<<<<<\n\nx============x")
}

/// Renders a stage error with its full causal chain, plus the backtrace when
/// one was captured.
#[must_use]
pub fn error_detail(err: &anyhow::Error) -> String {
    format!("{err:?}")
}

/// Trait for sinks receiving stage lifecycle entries.
///
/// Implementations must tolerate sequential writes from the orchestrator and,
/// transitively, from whatever the stages log themselves.
pub trait LifecycleSink: Send + Sync {
    /// Records that a stage has started.
    fn stage_started(&self, stage: &str);

    /// Records that a stage has completed.
    fn stage_completed(&self, stage: &str, duration_ms: f64);

    /// Records that a stage has failed.
    fn stage_failed(&self, stage: &str, err: &anyhow::Error);
}

/// Severity of a lifecycle entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleLevel {
    /// Started and completed banners.
    Info,
    /// Stage failures.
    Error,
}

/// Kind of a lifecycle entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleKind {
    /// The stage started.
    Started,
    /// The stage completed.
    Completed,
    /// The stage failed.
    Failed,
}

impl LifecycleKind {
    /// Returns the event type recorded with tracing output.
    #[must_use]
    pub fn event_type(self) -> &'static str {
        match self {
            Self::Started => "stage.started",
            Self::Completed => "stage.completed",
            Self::Failed => "stage.failed",
        }
    }

    /// Returns the level this kind is logged at.
    #[must_use]
    pub fn level(self) -> LifecycleLevel {
        match self {
            Self::Started | Self::Completed => LifecycleLevel::Info,
            Self::Failed => LifecycleLevel::Error,
        }
    }
}

impl fmt::Display for LifecycleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_type())
    }
}

/// One recorded lifecycle entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleEntry {
    /// The entry kind.
    pub kind: LifecycleKind,
    /// The stage name.
    pub stage: String,
    /// The rendered message (banner or error detail).
    pub message: String,
    /// When the entry was recorded (ISO 8601).
    pub timestamp: String,
}

impl LifecycleEntry {
    /// Creates a new entry stamped with the current time.
    #[must_use]
    pub fn new(kind: LifecycleKind, stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            stage: stage.into(),
            message: message.into(),
            timestamp: crate::utils::iso_timestamp(),
        }
    }

    /// Returns the entry level.
    #[must_use]
    pub fn level(&self) -> LifecycleLevel {
        self.kind.level()
    }
}

/// A sink that discards all entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpLifecycleSink;

impl LifecycleSink for NoOpLifecycleSink {
    fn stage_started(&self, _stage: &str) {}

    fn stage_completed(&self, _stage: &str, _duration_ms: f64) {}

    fn stage_failed(&self, _stage: &str, _err: &anyhow::Error) {}
}

/// A sink that writes entries through the tracing framework.
///
/// Banners go out at INFO, failures at ERROR with the full error chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLifecycleSink;

impl LifecycleSink for TracingLifecycleSink {
    fn stage_started(&self, stage: &str) {
        info!(
            stage = %stage,
            event = LifecycleKind::Started.event_type(),
            "{}",
            started_banner(stage)
        );
    }

    fn stage_completed(&self, stage: &str, duration_ms: f64) {
        info!(
            stage = %stage,
            event = LifecycleKind::Completed.event_type(),
            duration_ms,
            "{}",
            completed_banner(stage)
        );
    }

    fn stage_failed(&self, stage: &str, err: &anyhow::Error) {
        error!(
            stage = %stage,
            event = LifecycleKind::Failed.event_type(),
            error = %format!("{err:#}"),
            "{}",
            error_detail(err)
        );
    }
}

/// A sink that keeps every entry in memory, for tests and reports.
#[derive(Debug, Default)]
pub struct CollectingLifecycleSink {
    entries: RwLock<Vec<LifecycleEntry>>,
}

impl CollectingLifecycleSink {
    /// Creates a new collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected entries.
    #[must_use]
    pub fn entries(&self) -> Vec<LifecycleEntry> {
        self.entries.read().clone()
    }

    /// Returns the number of collected entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing has been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Clears all collected entries.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Returns entries of one kind.
    #[must_use]
    pub fn entries_of_kind(&self, kind: LifecycleKind) -> Vec<LifecycleEntry> {
        self.entries
            .read()
            .iter()
            .filter(|e| e.kind == kind)
            .cloned()
            .collect()
    }

    /// Returns entries for one stage.
    #[must_use]
    pub fn entries_for_stage(&self, stage: &str) -> Vec<LifecycleEntry> {
        self.entries
            .read()
            .iter()
            .filter(|e| e.stage == stage)
            .cloned()
            .collect()
    }

    /// Returns `(kind, stage)` pairs in recording order.
    #[must_use]
    pub fn sequence(&self) -> Vec<(LifecycleKind, String)> {
        self.entries
            .read()
            .iter()
            .map(|e| (e.kind, e.stage.clone()))
            .collect()
    }

    fn push(&self, entry: LifecycleEntry) {
        self.entries.write().push(entry);
    }
}

impl LifecycleSink for CollectingLifecycleSink {
    fn stage_started(&self, stage: &str) {
        self.push(LifecycleEntry::new(
            LifecycleKind::Started,
            stage,
            started_banner(stage),
        ));
    }

    fn stage_completed(&self, stage: &str, _duration_ms: f64) {
        self.push(LifecycleEntry::new(
            LifecycleKind::Completed,
            stage,
            completed_banner(stage),
        ));
    }

    fn stage_failed(&self, stage: &str, err: &anyhow::Error) {
        self.push(LifecycleEntry::new(
            LifecycleKind::Failed,
            stage,
            error_detail(err),
        ));
    }
}
