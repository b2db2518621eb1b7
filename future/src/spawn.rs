/// Launches a closure inside a tracing span.
///
/// The span is a root span (`parent: None`) that follows from the caller's
/// current span, so the closure's events are grouped under the task name even
/// though it runs on another thread.
///
/// # Syntax
///
/// ```text
/// // Simple case (no fields):
/// async_future::spawn!(runtime, "task_name", || { ... })
///
/// // With span fields (use parentheses):
/// async_future::spawn!(runtime, "task_name", (?field1, field2 = value), || { ... })
/// ```
///
/// # Example
///
/// ```no_run
/// let url = "http://example.com";
/// let task = async_future::spawn!(
///     async_future::default_runtime(),
///     "fetch",
///     (%url),
///     move || url.len()
/// );
/// assert_eq!(task.wait(), Ok(&18));
/// ```
#[macro_export]
macro_rules! spawn {
    // Fields are wrapped in parentheses for clear delimitation
    ($runtime:expr, $name:literal, ($($field:tt)*), $f:expr) => {{
        let f = $f;
        let span = $crate::__private::tracing::trace_span!(parent: None, $name, $($field)*);
        span.follows_from($crate::__private::tracing::Span::current());
        $runtime.spawn(move || span.in_scope(f))
    }};

    ($runtime:expr, $name:literal, $f:expr) => {{
        let f = $f;
        let span = $crate::__private::tracing::trace_span!(parent: None, $name);
        span.follows_from($crate::__private::tracing::Span::current());
        $runtime.spawn(move || span.in_scope(f))
    }};
}
