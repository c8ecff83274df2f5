//! Line formatting: `[ {prefix}:{TAG} ] {date} {time} {message}`

use std::fmt::{self, Write as _};
use std::path::Path;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use super::Severity;

const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct PrefixFormatter {
    prefix_name: String,
    timestamps: bool,
}

impl PrefixFormatter {
    pub fn new(prefix_name: impl Into<String>, timestamps: bool) -> Self {
        Self {
            prefix_name: prefix_name.into(),
            timestamps,
        }
    }

    /// The `[ name:TAG ] ` lead every line of a given severity starts with.
    pub fn prefix(&self, severity: Severity) -> String {
        format!("[ {}:{} ] ", self.prefix_name, severity.tag())
    }

    fn lead(&self, severity: Severity) -> String {
        let mut lead = self.prefix(severity);
        if self.timestamps {
            let _ = write!(lead, "{} ", chrono::Local::now().format(TIMESTAMP_FORMAT));
        }
        lead
    }
}

impl<S, N> FormatEvent<S, N> for PrefixFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        let severity = Severity::of(meta);
        let lead = self.lead(severity);

        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);

        if let Some(ref error) = visitor.error {
            writeln!(writer, "{lead}{error}")?;
        }

        write!(writer, "{lead}")?;
        if severity == Severity::Debug {
            if let (Some(file), Some(line)) = (meta.file(), meta.line()) {
                let short = Path::new(file)
                    .file_name()
                    .map(|name| name.to_string_lossy())
                    .unwrap_or_else(|| file.into());
                write!(writer, "{short}:{line}: ")?;
            }
        }
        write!(writer, "{}", visitor.message)?;
        for field in &visitor.fields {
            write!(writer, " {field}")?;
        }
        writeln!(writer)
    }
}

#[derive(Default)]
struct LineVisitor {
    message: String,
    error: Option<String>,
    fields: Vec<String>,
}

impl LineVisitor {
    fn record_rendered(&mut self, field: &Field, rendered: String) {
        match field.name() {
            "message" => self.message = rendered,
            "error" => self.error = Some(rendered),
            name => self.fields.push(format!("{name}={rendered}")),
        }
    }
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_rendered(field, value.to_string());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.record_rendered(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_rendered(field, format!("{value:?}"));
    }
}
