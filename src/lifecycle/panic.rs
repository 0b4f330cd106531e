//! Panic-safe task runner.
//!
//! # Responsibilities
//! - Run a unit of work on its own tokio task
//! - Turn an unwinding panic into a logged, fatal stop
//!
//! Ordinary errors must be returned as `Result`s; this is only the last line
//! of defence for code that was not supposed to fail.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures_util::FutureExt;
use tokio::task::JoinHandle;

use crate::lifecycle::context::AppContext;

/// A panic recovered from a task.
#[derive(Debug, Clone, thiserror::Error)]
#[error("recovered from panic in {task}: {message}")]
pub struct TaskPanic {
    pub task: String,
    pub message: String,
}

/// Best-effort description of a panic payload.
pub fn describe_panic(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Drive `work` to completion, capturing a panic instead of unwinding further.
pub async fn catch_panic<F>(task: &str, work: F) -> Result<F::Output, TaskPanic>
where
    F: Future,
{
    AssertUnwindSafe(work)
        .catch_unwind()
        .await
        .map_err(|payload| TaskPanic {
            task: task.to_string(),
            message: describe_panic(payload.as_ref()),
        })
}

/// Spawn `work` on a new task. A panic inside it is logged and escalated to
/// [`AppContext::fatal`].
///
/// The handle yields `None` when the work panicked.
pub fn spawn_guarded<F>(ctx: &AppContext, task: &'static str, work: F) -> JoinHandle<Option<F::Output>>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let ctx = ctx.clone();
    tokio::spawn(async move {
        match catch_panic(task, work).await {
            Ok(output) => Some(output),
            Err(panic) => {
                tracing::error!(task, error = %panic, "Panic in guarded task");
                ctx.fatal(&panic, "Stopped: unrecovered panic");
                None
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Arc;

    fn recording_context() -> (AppContext, Arc<AtomicI32>) {
        let code = Arc::new(AtomicI32::new(-1));
        let seen = code.clone();
        let ctx = AppContext::with_exit_hook(Arc::new(move |c| seen.store(c, Ordering::SeqCst)));
        (ctx, code)
    }

    #[tokio::test]
    async fn test_catch_panic_passes_output_through() {
        let out = catch_panic("ok", async { 41 + 1 }).await.unwrap();
        assert_eq!(out, 42);
    }

    #[tokio::test]
    async fn test_catch_panic_describes_str_payload() {
        let err = catch_panic("boom", async { panic!("static message") })
            .await
            .unwrap_err();
        assert_eq!(err.task, "boom");
        assert_eq!(err.message, "static message");
    }

    #[tokio::test]
    async fn test_catch_panic_describes_formatted_payload() {
        let n = 7;
        let err = catch_panic("fmt", async move {
            if n > 0 {
                panic!("bad value {}", n);
            }
        })
        .await
        .unwrap_err();
        assert_eq!(err.message, "bad value 7");
        assert!(err.to_string().contains("fmt"));
    }

    #[test]
    fn test_describe_panic_unknown_payload() {
        let payload: Box<dyn Any + Send> = Box::new(12_u8);
        assert_eq!(describe_panic(payload.as_ref()), "non-string panic payload");
    }

    #[tokio::test]
    async fn test_spawn_guarded_panic_is_fatal() {
        let (ctx, code) = recording_context();
        let handle = spawn_guarded(&ctx, "exploding", async {
            panic!("kaboom");
        });

        let out: Option<()> = handle.await.unwrap();
        assert!(out.is_none());
        assert_eq!(code.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_spawn_guarded_normal_completion() {
        let (ctx, code) = recording_context();
        let handle = spawn_guarded(&ctx, "quiet", async { "done" });

        assert_eq!(handle.await.unwrap(), Some("done"));
        assert_eq!(code.load(Ordering::SeqCst), -1);
    }
}
