use crate::generator::{ArtifactKind, Language};
use crate::logging::TracingOptions;
use crate::parser::resolve::DEFAULT_FETCH_TIMEOUT;
use anyhow::{anyhow, bail, Context, Result};
use clap::{App, Arg, ArgMatches};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Everything the command line decides for one generation run.
#[derive(Debug)]
pub struct Config {
    pub abi_file: PathBuf,
    pub encode: bool,
    pub decode: bool,
    pub language: Language,
    pub output_dir: PathBuf,
    pub fetch_timeout: Duration,
    pub tracing: TracingOptions,
}

pub fn app() -> App<'static, 'static> {
    App::new("simpleabi")
        .version("0.1.0")
        .about("Generates C call encoders and dispatchers for Qtum contracts from SimpleABI files")
        .arg(
            Arg::with_name("abi")
                .short("a")
                .long("abi")
                .value_name("FILE")
                .help("Path of the SimpleABI file, must use the .abi extension")
                .required(true)
                .takes_value(true),
        )
        .arg(
            Arg::with_name("encode")
                .short("e")
                .long("encode")
                .help("Generate the caller-side encoding sources"),
        )
        .arg(
            Arg::with_name("decode")
                .short("d")
                .long("decode")
                .help("Generate the callee-side dispatcher sources"),
        )
        .arg(
            Arg::with_name("lang")
                .short("l")
                .long("lang")
                .value_name("LANG")
                .help("Language to generate, must be one of: c")
                .default_value("c")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("DIR")
                .help("Output directory for generated files")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("fetch-timeout")
                .long("fetch-timeout")
                .value_name("SECS")
                .help("Timeout for fetching remote interfaces")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .multiple(true)
                .help("Use verbose output, -vv for trace output"),
        )
        .arg(
            Arg::with_name("silent")
                .short("s")
                .long("silent")
                .help("Silence all output"),
        )
}

impl Config {
    pub fn from_matches(matches: &ArgMatches) -> Result<Config> {
        let abi_file = PathBuf::from(
            matches
                .value_of("abi")
                .ok_or_else(|| anyhow!("an .abi file is required"))?,
        );
        let encode = matches.is_present("encode");
        let decode = matches.is_present("decode");
        if !encode && !decode {
            bail!("Must select one of encode or decode (or both) as an option to use this tool");
        }

        let language: Language = matches.value_of("lang").unwrap_or("c").parse()?;

        let fetch_timeout = match matches.value_of("fetch-timeout") {
            Some(secs) => Duration::from_secs(
                secs.parse()
                    .with_context(|| format!("Invalid fetch timeout: {}", secs))?,
            ),
            None => DEFAULT_FETCH_TIMEOUT,
        };

        let config = Config {
            abi_file,
            encode,
            decode,
            language,
            output_dir: PathBuf::from(matches.value_of("output").unwrap_or(".")),
            fetch_timeout,
            tracing: TracingOptions {
                verbosity: matches.occurrences_of("verbose"),
                silent: matches.is_present("silent"),
            },
        };
        config.check_abi_file()?;
        Ok(config)
    }

    fn check_abi_file(&self) -> Result<()> {
        if !self.abi_file.is_file() {
            bail!("Please include a valid path to a valid .abi file");
        }
        let extension = self.abi_file.extension().and_then(|ext| ext.to_str());
        if extension != Some("abi") {
            bail!(
                "Expected file extension .abi, got {}",
                extension.map(|ext| format!(".{}", ext)).unwrap_or_default()
            );
        }
        Ok(())
    }

    /// The artifacts selected by `--encode` and `--decode`, in that order.
    pub fn artifact_kinds(&self) -> Vec<ArtifactKind> {
        let mut kinds = Vec::new();
        if self.encode {
            kinds.extend(ArtifactKind::ENCODE);
        }
        if self.decode {
            kinds.extend(ArtifactKind::DECODE);
        }
        kinds
    }

    pub fn output_path(&self, file_name: &str) -> PathBuf {
        Path::new(&self.output_dir).join(file_name)
    }
}
