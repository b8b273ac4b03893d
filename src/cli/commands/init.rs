use anyhow::{bail, Context, Result};
use std::path::Path;

use crate::azure::AzureEnvironment;
use crate::cli::config::{Config, CONFIG_FILENAME};
use crate::cli::InitArgs;
use crate::repro::ReproNames;

pub fn execute_init(args: InitArgs) -> Result<()> {
    if Path::new(CONFIG_FILENAME).exists() && !args.force {
        bail!(
            "{} already exists. Use --force to overwrite.",
            CONFIG_FILENAME
        );
    }

    if let Some(ref prefix) = args.prefix {
        ReproNames::from_prefix(prefix)
            .with_context(|| format!("Invalid prefix '{}'", prefix))?;
    }

    // Store the canonical cloud name
    let cloud = args
        .cloud
        .as_deref()
        .map(AzureEnvironment::from_name)
        .transpose()?
        .map(|env| env.name);

    let config = Config {
        prefix: args.prefix,
        location: args.location,
        cloud,
        ..Config::default()
    };

    config.save()?;

    eprintln!("Created {}", CONFIG_FILENAME);
    if let Some(ref prefix) = config.prefix {
        eprintln!("  prefix: {}", prefix);
    }
    if let Some(ref location) = config.location {
        eprintln!("  location: {}", location);
    }
    if let Some(ref cloud) = config.cloud {
        eprintln!("  cloud: {}", cloud);
    }
    eprintln!();
    eprintln!("Next: acr-classic-repro plan");

    Ok(())
}
