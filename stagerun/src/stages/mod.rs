//! Stage trait and implementations.
//!
//! A stage is one opaque unit of pipeline work. The orchestrator reaches it
//! through a single entry point that either completes or fails; whatever the
//! stage does internally is invisible to it.

mod command;

pub use command::{CommandError, CommandStage};

use async_trait::async_trait;
use std::fmt::Debug;
use std::future::Future;
use std::marker::PhantomData;

/// Trait for pipeline stages.
///
/// A stage instance is built fresh for every pipeline execution and `run`
/// is called at most once on it. Any error is fatal to the run and is
/// propagated to the caller exactly as returned.
#[async_trait]
pub trait Stage: Send + Debug {
    /// Performs the stage's work.
    async fn run(&mut self) -> anyhow::Result<()>;
}

/// A stage backed by an async closure.
pub struct FnStage<F, Fut>
where
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = anyhow::Result<()>> + Send,
{
    func: F,
    _phantom: PhantomData<fn() -> Fut>,
}

impl<F, Fut> FnStage<F, Fut>
where
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = anyhow::Result<()>> + Send,
{
    /// Creates a new closure-backed stage.
    pub fn new(func: F) -> Self {
        Self {
            func,
            _phantom: PhantomData,
        }
    }
}

impl<F, Fut> Debug for FnStage<F, Fut>
where
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = anyhow::Result<()>> + Send,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnStage").finish_non_exhaustive()
    }
}

#[async_trait]
impl<F, Fut> Stage for FnStage<F, Fut>
where
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = anyhow::Result<()>> + Send,
{
    async fn run(&mut self) -> anyhow::Result<()> {
        (self.func)().await
    }
}

/// A stage that does nothing and always succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpStage;

#[async_trait]
impl Stage for NoOpStage {
    async fn run(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_fn_stage_success() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut stage = FnStage::new(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        assert!(stage.run().await.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fn_stage_failure() {
        let mut stage = FnStage::new(|| async { anyhow::bail!("disk full") });

        let err = stage.run().await.unwrap_err();
        assert_eq!(err.to_string(), "disk full");
    }

    #[tokio::test]
    async fn test_noop_stage() {
        let mut stage = NoOpStage;
        assert!(stage.run().await.is_ok());
    }

    #[test]
    fn test_fn_stage_debug() {
        let stage = FnStage::new(|| async { Ok(()) });
        assert_eq!(format!("{stage:?}"), "FnStage { .. }");
    }
}
