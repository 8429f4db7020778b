use std::io::Write;

use nu_ansi_term::Color::{self, Blue, Magenta, Red, Yellow};
use tracing::{field::Field, Event, Level, Metadata, Subscriber};
use tracing_subscriber::{
    fmt::{
        self,
        format::{FmtSpan, Writer},
        FmtContext, FormatEvent, FormatFields, MakeWriter,
    },
    registry::LookupSpan,
};

use crate::{cli::Args, utils::Colored};

/// Message plus the structured fields commands attach (`path`, `bytes`, ...).
#[derive(Default)]
struct EventVisitor {
    message: Option<String>,
    fields: Vec<(&'static str, String)>,
}

impl tracing::field::Visit for EventVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields.push((field.name(), value.to_string()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        } else {
            self.fields.push((field.name(), format!("{value:?}")));
        }
    }
}

fn level_tag(level: Level) -> Option<(Color, &'static str)> {
    match level {
        Level::TRACE => Some((Magenta, "[TRACE]")),
        Level::DEBUG => Some((Blue, "[DEBUG]")),
        Level::INFO => None,
        Level::WARN => Some((Yellow, "[WARN]")),
        Level::ERROR => Some((Red, "[ERROR]")),
    }
}

fn render_fields(fields: &[(&str, String)]) -> String {
    fields
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Plain-text output: a colored level tag for everything but INFO, then the
/// message. With `show_fields` the event's structured fields follow it.
pub struct CustomFormatter {
    show_fields: bool,
}

impl<S, N> FormatEvent<S, N> for CustomFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        if let Some((color, tag)) = level_tag(*event.metadata().level()) {
            write!(writer, "{} ", Colored(color, tag))?;
        }
        write!(writer, "{}", visitor.message.as_deref().unwrap_or_default())?;

        if self.show_fields && !visitor.fields.is_empty() {
            let fields = render_fields(&visitor.fields);
            write!(writer, "  {}", Colored(Color::DarkGray, fields))?;
        }
        writeln!(writer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

/// Command output (INFO) goes to stdout and diagnostics to stderr. In JSON
/// mode every record goes to stdout so one pipe carries the whole stream.
fn stream_for(level: Level, json: bool) -> Stream {
    if json || level == Level::INFO {
        Stream::Stdout
    } else {
        Stream::Stderr
    }
}

struct ConsoleWriters {
    json: bool,
}

/// Buffers one record and prints it with the download bars suspended.
struct ConsoleWriter {
    buffer: Vec<u8>,
    stream: Stream,
}

impl Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if self.buffer.is_empty() {
            return;
        }

        let output = String::from_utf8_lossy(&self.buffer);
        let output = output.trim_end_matches('\n');
        let stream = self.stream;
        crate::progress::suspend(|| match stream {
            Stream::Stdout => println!("{output}"),
            Stream::Stderr => eprintln!("{output}"),
        });
    }
}

impl<'a> MakeWriter<'a> for ConsoleWriters {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter {
            buffer: Vec::new(),
            stream: Stream::Stdout,
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter {
            buffer: Vec::new(),
            stream: stream_for(*meta.level(), self.json),
        }
    }
}

fn filter_level(args: &Args) -> Level {
    if args.quiet {
        Level::ERROR
    } else if args.verbose >= 2 {
        Level::TRACE
    } else if args.verbose == 1 {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

/// Targets match by prefix, so `drivekit` covers every crate of the workspace.
fn env_filter(level: Level) -> String {
    format!("drivekit={level}")
}

pub fn setup_logging(args: &Args) {
    let level = filter_level(args);
    let builder = fmt::Subscriber::builder()
        .with_env_filter(env_filter(level))
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(ConsoleWriters {
            json: args.json,
        })
        .compact()
        .without_time();

    let subscriber: Box<dyn Subscriber + Send + Sync> = if args.json {
        Box::new(builder.json().flatten_event(true).finish())
    } else {
        let formatter = CustomFormatter {
            show_fields: level >= Level::DEBUG,
        };
        Box::new(builder.event_format(formatter).finish())
    };

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}
