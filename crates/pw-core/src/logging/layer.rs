//! JSONL tracing layer.
//!
//! Each event becomes one [`LogRecord`] line on the writer (stderr in the
//! binary). Correlation keys recorded on enclosing spans (`run_id`,
//! `command`, `archive`) are lifted to the top level of the record.

use std::io::{self, Write};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Number, Value};
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

/// Span fields promoted into every record emitted inside the span.
#[derive(Debug, Clone, Default)]
struct Correlation {
    run_id: Option<String>,
    command: Option<String>,
    archive: Option<String>,
}

impl Correlation {
    fn slot(&mut self, name: &str) -> Option<&mut Option<String>> {
        match name {
            "run_id" => Some(&mut self.run_id),
            "command" => Some(&mut self.command),
            "archive" => Some(&mut self.archive),
            _ => None,
        }
    }

    /// Fill keys still missing here from an outer span.
    fn inherit(&mut self, outer: &Correlation) {
        for (mine, theirs) in [
            (&mut self.run_id, &outer.run_id),
            (&mut self.command, &outer.command),
            (&mut self.archive, &outer.archive),
        ] {
            if mine.is_none() {
                mine.clone_from(theirs);
            }
        }
    }
}

impl Visit for Correlation {
    fn record_str(&mut self, field: &Field, value: &str) {
        if let Some(slot) = self.slot(field.name()) {
            *slot = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if let Some(slot) = self.slot(field.name()) {
            *slot = Some(format!("{:?}", value));
        }
    }
}

/// One JSONL line.
#[derive(Debug, Serialize)]
pub struct LogRecord<'a> {
    pub ts: DateTime<Utc>,
    pub level: &'static str,
    /// Event target, e.g. `pw_archive::decoder`.
    pub target: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub fields: Map<String, Value>,
}

/// Event fields as JSON values; `message` is kept apart.
#[derive(Default)]
struct EventFields {
    message: Option<String>,
    fields: Map<String, Value>,
}

impl EventFields {
    fn put(&mut self, field: &Field, value: Value) {
        self.fields.insert(field.name().to_string(), value);
    }
}

impl Visit for EventFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.put(field, Value::String(value.to_string()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        } else {
            self.put(field, Value::String(format!("{:?}", value)));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, Value::Number(value.into()));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, Value::Number(value.into()));
    }

    // Wheel values exceed u64; keep them exact as strings.
    fn record_u128(&mut self, field: &Field, value: u128) {
        self.put(field, Value::String(value.to_string()));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        // NaN and infinities have no JSON form
        if let Some(n) = Number::from_f64(value) {
            self.put(field, Value::Number(n));
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, Value::Bool(value));
    }
}

/// Writes events as JSON lines.
pub struct JsonlLayer<W = io::Stderr> {
    writer: Mutex<W>,
}

impl JsonlLayer<io::Stderr> {
    pub fn stderr() -> Self {
        JsonlLayer::new(io::stderr())
    }
}

impl<W: Write> JsonlLayer<W> {
    pub fn new(writer: W) -> Self {
        JsonlLayer {
            writer: Mutex::new(writer),
        }
    }
}

impl<S, W> Layer<S> for JsonlLayer<W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: Write + 'static,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let mut correlation = Correlation::default();
        attrs.record(&mut correlation);
        if let Some(span) = ctx.span(id) {
            span.extensions_mut().insert(correlation);
        }
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(id) {
            if let Some(correlation) = span.extensions_mut().get_mut::<Correlation>() {
                values.record(correlation);
            }
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        // Innermost span wins for each key.
        let mut correlation = Correlation::default();
        if let Some(scope) = ctx.event_scope(event) {
            for span in scope {
                if let Some(outer) = span.extensions().get::<Correlation>() {
                    correlation.inherit(outer);
                }
            }
        }

        let mut fields = EventFields::default();
        event.record(&mut fields);

        let metadata = event.metadata();
        let record = LogRecord {
            ts: Utc::now(),
            level: level_name(metadata.level()),
            target: metadata.target(),
            run_id: correlation.run_id,
            command: correlation.command,
            archive: correlation.archive,
            message: fields.message,
            fields: fields.fields,
        };

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
        }
    }
}

fn level_name(level: &tracing::Level) -> &'static str {
    match *level {
        tracing::Level::TRACE => "trace",
        tracing::Level::DEBUG => "debug",
        tracing::Level::INFO => "info",
        tracing::Level::WARN => "warn",
        tracing::Level::ERROR => "error",
    }
}
