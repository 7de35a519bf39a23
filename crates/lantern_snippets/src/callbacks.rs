//! Deferred callbacks and the event queue.
//!
//! Queued work only runs once the synchronous body has returned, no matter
//! how long that body takes or how small the delay is.

use lantern_core::{RegistryError, SnippetResult, Topic};
use lantern_runtime::{FnSnippet, Runner, SnippetContext};

/// Register this module's snippets
///
/// # Errors
///
/// Returns error if a name is already taken
pub fn register(runner: &mut Runner) -> Result<(), RegistryError> {
    runner.register(
        FnSnippet::new("eventQueue", event_queue)
            .with_topic(Topic::Async)
            .with_summary("an already queued event waits for the running body to finish"),
    )?;
    runner.register(
        FnSnippet::new("timerOrdering", timer_ordering)
            .with_topic(Topic::Async)
            .with_summary("callbacks fire by due time, including ones scheduled from a callback"),
    )?;
    Ok(())
}

fn click_handler(ctx: &mut SnippetContext) -> SnippetResult {
    ctx.emit("click event!");
    Ok(())
}

/// Long synchronous work; never yields to queued callbacks
fn wait_three_seconds(ctx: &mut SnippetContext) {
    tracing::trace!(pending = ctx.pending(), "blocking body, queue untouched");
    ctx.emit("finished function");
}

fn event_queue(ctx: &mut SnippetContext) -> SnippetResult {
    // The click arrives immediately, but the handler is only queued.
    ctx.set_timeout(0, click_handler);
    wait_three_seconds(ctx);
    ctx.emit("finished execution");
    Ok(())
}

fn timer_ordering(ctx: &mut SnippetContext) -> SnippetResult {
    ctx.set_timeout(30, |ctx| {
        ctx.emit("third");
        Ok(())
    });
    ctx.set_timeout(10, |ctx| {
        ctx.emit("first");
        // Due at 10 + 15, between second and third.
        ctx.set_timeout(15, |ctx| {
            ctx.emit("nested");
            Ok(())
        });
        Ok(())
    });
    ctx.set_timeout(20, |ctx| {
        ctx.emit("second");
        Ok(())
    });
    ctx.emit("scheduled");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lantern_log::{LineCursor, Origin};
    use lantern_runtime::RunnerConfig;

    fn runner() -> Runner {
        let mut runner = Runner::new(RunnerConfig::default()).unwrap();
        register(&mut runner).unwrap();
        runner
    }

    #[tokio::test(start_paused = true)]
    async fn test_event_queue_runs_after_body() {
        let result = runner().run_one("eventQueue").await.unwrap();
        assert!(result.succeeded());
        assert_eq!(
            result.texts(),
            vec!["finished function", "finished execution", "click event!"]
        );
        assert_eq!(result.lines()[2].origin(), Origin::Deferred);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_ordering() {
        let result = runner().run_one("timerOrdering").await.unwrap();
        assert!(result.succeeded());
        assert_eq!(
            result.texts(),
            vec!["scheduled", "first", "second", "nested", "third"]
        );

        let offsets: Vec<u64> = result.lines().iter().map(|l| l.at().as_millis()).collect();
        assert_eq!(offsets, vec![0, 10, 20, 25, 30]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_ordering_under_short_timeout() {
        let mut runner = Runner::new(RunnerConfig::default().with_timeout_millis(22)).unwrap();
        register(&mut runner).unwrap();

        let result = runner.run_one("timerOrdering").await.unwrap();
        assert!(result.is_incomplete());
        let mut cursor = LineCursor::new(result.lines());
        assert!(cursor.contains_in_order(&["scheduled", "first", "second"]));
        assert!(cursor.find("third").is_none());
    }
}
