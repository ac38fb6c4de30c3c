/// Creates a root span based on the provided sampling rate.
/// Sampling here is a pre-filter: an unsampled request never pays for
/// span creation or context propagation at all.
///
/// # Behavior
/// - If a parent span is active: always creates the span (keeps the trace whole)
/// - If no parent exists: samples at `sample_percent` (0.0 to 1.0)
///
/// # Example
/// ```ignore
/// let span = sample_or_attach_root_span!(0.05, "process_report", route = "/api/process-ppc");
/// let _guard = span.enter();
/// ```
#[macro_export]
macro_rules! sample_or_attach_root_span {
    ($sample_percent:expr, $span_name:literal) => {{
        let current = ::tracing::Span::current();

        if !current.is_disabled() || ::rand::random::<f32>() < $sample_percent {
            ::tracing::info_span!($span_name)
        } else {
            ::tracing::Span::none()
        }
    }};
    ($sample_percent:expr, $span_name:literal, $($fields:tt)*) => {{
        let current = ::tracing::Span::current();

        if !current.is_disabled() || ::rand::random::<f32>() < $sample_percent {
            ::tracing::info_span!($span_name, $($fields)*)
        } else {
            ::tracing::Span::none()
        }
    }};
}

/// Creates an INFO-level child span only if the parent span is active (sampled),
/// otherwise `Span::none()`.
///
/// Returns an **un-entered** `Span`, call `.entered()` or use `.instrument()`.
///
/// ```ignore
/// let span = child_span_info!("parse_report", rows = tracing::field::Empty);
/// span.record("rows", 12);
/// ```
#[macro_export]
macro_rules! child_span_info {
    ($span_name:literal) => {{
        if !::tracing::Span::current().is_disabled() {
            ::tracing::info_span!($span_name)
        } else {
            ::tracing::Span::none()
        }
    }};
    ($span_name:literal, $($fields:tt)*) => {{
        if !::tracing::Span::current().is_disabled() {
            ::tracing::info_span!($span_name, $($fields)*)
        } else {
            ::tracing::Span::none()
        }
    }};
}

/// DEBUG-level variant of [`child_span_info!`]
#[macro_export]
macro_rules! child_span_debug {
    ($span_name:literal) => {{
        if !::tracing::Span::current().is_disabled() {
            ::tracing::debug_span!($span_name)
        } else {
            ::tracing::Span::none()
        }
    }};
    ($span_name:literal, $($fields:tt)*) => {{
        if !::tracing::Span::current().is_disabled() {
            ::tracing::debug_span!($span_name, $($fields)*)
        } else {
            ::tracing::Span::none()
        }
    }};
}
