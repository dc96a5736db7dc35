use anyhow::{Context, Result};
use std::fs;
use simpleabi::config::{self, Config};
use simpleabi::generator::{self, Language};
use simpleabi::logging;
use simpleabi::parser::{DefaultLoader, InterfaceParser};
use tracing::info;

fn main() -> Result<()> {
    let matches = config::app().get_matches();
    let config = Config::from_matches(&matches)?;
    logging::init_tracing_subscriber(&config.tracing);

    // Parse the ABI file, following any implemented interfaces
    let mut parser = InterfaceParser::with_loader(DefaultLoader::new(config.fetch_timeout));
    let contract = parser
        .parse_file(&config.abi_file)
        .with_context(|| format!("Error in parsing your abi file: {}", config.abi_file.display()))?;

    let artifacts = match config.language {
        Language::C => generator::generate_all(&contract, &config.artifact_kinds())
            .with_context(|| format!("Failed to generate C code for {}", contract.name))?,
    };

    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("Failed to create output directory: {}", config.output_dir.display())
    })?;

    for artifact in artifacts {
        let output_file = config.output_path(&artifact.file_name);
        fs::write(&output_file, &artifact.contents)
            .with_context(|| format!("Failed to write output file: {}", output_file.display()))?;
        info!("Successfully generated {}", output_file.display());
    }

    Ok(())
}
