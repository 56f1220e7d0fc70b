//! Subscriber construction

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

use crate::config::{Config, DisplayConfig, Format, WriterConfig};
use crate::{Error, Result};

/// Builds and installs the global subscriber from a [`Config`].
#[derive(Debug)]
pub struct LoggerBuilder {
    config: Config,
}

/// Returned by [`LoggerBuilder::build`]; keep it alive for the lifetime of
/// the program.
#[derive(Debug)]
#[must_use]
pub struct LoggerGuard {
    format: Format,
}

impl LoggerGuard {
    /// Format the installed subscriber writes in.
    #[must_use]
    pub fn format(&self) -> Format {
        self.format
    }
}

type Stack = tracing_subscriber::layer::Layered<EnvFilter, Registry>;
type BoxedLayer = Box<dyn Layer<Stack> + Send + Sync + 'static>;

macro_rules! fmt_layer {
    ($format:ident, $display:expr, $writer:expr) => {
        tracing_subscriber::fmt::layer()
            .$format()
            .with_writer($writer)
            .with_ansi($display.colors)
            .with_target($display.target)
            .with_file($display.source)
            .with_line_number($display.source)
            .with_thread_names($display.thread_names)
    };
}

impl LoggerBuilder {
    /// Create builder from config
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Parse the filter, build the format layer and install the subscriber
    /// globally.
    ///
    /// # Errors
    /// - [`Error::Filter`] if `level` is not valid `EnvFilter` syntax;
    /// - [`Error::AlreadyInitialized`] if a global subscriber exists.
    pub fn build(self) -> Result<LoggerGuard> {
        let filter = EnvFilter::try_new(&self.config.level).map_err(|e| Error::Filter {
            filter: self.config.level.clone(),
            reason: e.to_string(),
        })?;
        let layer = format_layer(self.config.format, &self.config.display, make_writer(self.config.writer));

        Registry::default()
            .with(filter)
            .with(layer)
            .try_init()
            .map_err(|e| Error::AlreadyInitialized(e.to_string()))?;

        Ok(LoggerGuard {
            format: self.config.format,
        })
    }
}

fn format_layer(format: Format, display: &DisplayConfig, writer: BoxMakeWriter) -> BoxedLayer {
    match (format, display.time) {
        (Format::Pretty, true) => fmt_layer!(pretty, display, writer).boxed(),
        (Format::Pretty, false) => fmt_layer!(pretty, display, writer).without_time().boxed(),
        (Format::Compact, true) => fmt_layer!(compact, display, writer).boxed(),
        (Format::Compact, false) => fmt_layer!(compact, display, writer).without_time().boxed(),
        (Format::Json, true) => fmt_layer!(json, display, writer)
            .flatten_event(display.flatten)
            .with_current_span(true)
            .boxed(),
        (Format::Json, false) => fmt_layer!(json, display, writer)
            .flatten_event(display.flatten)
            .with_current_span(true)
            .without_time()
            .boxed(),
    }
}

fn make_writer(writer: WriterConfig) -> BoxMakeWriter {
    match writer {
        WriterConfig::Stderr => BoxMakeWriter::new(std::io::stderr),
        WriterConfig::Stdout => BoxMakeWriter::new(std::io::stdout),
    }
}
