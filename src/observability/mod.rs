//! OpenTelemetry tracing exported to a local file.
//!
//! ```text
//! tracing macros → tracing-opentelemetry → SDK provider → FileSpanExporter → zusers-otlp.json
//! ```
//!
//! Spans are written as OTLP JSON, one batch per line, to
//! `~/.local/share/zellij/zusers/zusers-otlp.json`. The file rotates at 10 MB
//! and keeps three backups. The level comes from the `trace_level` plugin
//! option (default `info`).
//!
//! Session tokens and passwords never appear in span fields; the types that
//! hold them have redacting `Debug` impls.

mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use init::{init_tracing, SERVICE_NAME, TRACE_FILE_NAME};
