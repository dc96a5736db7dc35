use std::{env, io};
use tracing::{Level, Metadata};
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt::MakeWriter,
};

const LOG_FILTER: &str = "RUST_LOG";

// WARN and ERROR go to stderr, everything else to stdout.
struct StdioTracingWriter;

impl<'a> MakeWriter<'a> for StdioTracingWriter {
    type Writer = Box<dyn io::Write>;

    fn make_writer(&'a self) -> Self::Writer {
        Box::new(io::stdout())
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        if meta.level() <= &Level::WARN {
            return Box::new(io::stderr());
        }
        Box::new(io::stdout())
    }
}

#[derive(Debug, Default)]
pub struct TracingOptions {
    pub verbosity: u64,
    pub silent: bool,
}

impl TracingOptions {
    fn level_filter(&self) -> Option<LevelFilter> {
        if self.silent {
            return Some(LevelFilter::OFF);
        }
        match self.verbosity {
            0 => None,
            1 => Some(LevelFilter::DEBUG),
            _ => Some(LevelFilter::TRACE),
        }
    }
}

/// `RUST_LOG` sets the minimum level, default is `INFO`. `-v`, `-vv` and
/// `--silent` override it.
pub fn init_tracing_subscriber(options: &TracingOptions) {
    let env_filter = match env::var_os(LOG_FILTER) {
        Some(_) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        None => EnvFilter::new("info"),
    };

    let builder = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_ansi(true)
        .with_level(false)
        .with_file(false)
        .with_line_number(false)
        .without_time()
        .with_target(false)
        .with_writer(StdioTracingWriter);

    if let Some(level_filter) = options.level_filter() {
        builder.with_max_level(level_filter).init();
    } else {
        builder.init();
    }
}
