/// Runs each task once against `$ctx`, in order. A failing task is logged and
/// does not stop the tasks after it.
#[macro_export]
macro_rules! cron_tasks {
    ($ctx:expr, $($t:path),* $(,)?) => {
        $({
            const TASK_NAME: &str = const_str::convert_ascii_case!(upper_camel, stringify!($t));
            let started = std::time::Instant::now();
            tracing::info!(task = TASK_NAME, "Starting cron task");
            match ($t)($ctx).await {
                Ok(result) => tracing::info!(
                    task = TASK_NAME,
                    elapsed = ?started.elapsed(),
                    ?result,
                    "Completed cron task",
                ),
                Err(e) => tracing::error!(
                    task = TASK_NAME,
                    elapsed = ?started.elapsed(),
                    "Cron task failed: {e:?}",
                ),
            }
        })*
    };
}
