use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Common CLI arguments
#[derive(Parser, Debug, Clone, Default)]
pub struct CommonArgs {
    #[arg(long, global = true, help = "Configuration file path")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Enable quiet mode (minimal output)")]
    pub quiet: bool,
}

/// Overrides for the generation run, applied on top of the loaded configuration
#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    #[arg(short = 'n', long, help = "Number of employees to generate")]
    pub employees: Option<u64>,

    #[arg(short, long, help = "Output directory for SQL files")]
    pub outdir: Option<PathBuf>,

    #[arg(long, help = "Do not write the set_sequences.sql file")]
    pub no_sequences: bool,

    #[arg(long, help = "Seed for reproducible output")]
    pub seed: Option<u64>,
}

impl GenerateArgs {
    pub fn apply(&self, config: &mut crate::config::Configuration) {
        if let Some(count) = self.employees {
            config.employees.count = count;
        }
        if let Some(dir) = &self.outdir {
            config.output.dir = dir.display().to_string();
        }
        if self.no_sequences {
            config.output.write_sequences = false;
        }
        if let Some(seed) = self.seed {
            config.employees.seed = Some(seed);
        }
    }
}

#[derive(Subcommand, Debug, Clone, Default)]
pub enum CommonCommands {
    /// Generate the SQL files (default behavior)
    #[default]
    Generate,
    /// Show current configuration and exit
    Config {
        #[arg(long, help = "Show configuration in JSON format")]
        json: bool,
    },
    /// Validate configuration and exit
    Validate,
    /// Show version information and exit
    Version,
}

/// Utility functions for CLI operations
pub mod utils {
    use super::*;
    use crate::config::Configuration;
    use anyhow::{Context, Result};
    use tracing_subscriber::EnvFilter;

    /// Initialize logging based on CLI arguments; `RUST_LOG` wins when set
    pub fn init_logging(args: &CommonArgs) {
        let level = if args.quiet {
            "warn"
        } else if args.verbose {
            "debug"
        } else {
            "info"
        };

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    /// Load configuration with optional override from CLI
    pub fn load_config(config_path: Option<&PathBuf>) -> Result<Configuration> {
        match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Configuration::load_from_path(path).context("Failed to load configuration")
            }
            None => Configuration::load().context("Failed to load configuration"),
        }
    }

    /// Display configuration in human-readable or JSON format
    pub fn display_config(config: &Configuration, json: bool) -> Result<()> {
        if json {
            let json = serde_json::to_string_pretty(config)
                .context("Failed to serialize configuration to JSON")?;
            println!("{json}");
        } else {
            println!("staffgen configuration:");
            println!("=======================");
            println!("Output directory: {}", config.output.dir);
            println!("Rows per INSERT: {}", config.output.chunk_size);
            println!("Write sequences: {}", config.output.write_sequences);
            println!("Employees: {}", config.employees.count);
            match config.employees.seed {
                Some(seed) => println!("Seed: {seed}"),
                None => println!("Seed: random"),
            }
            println!(
                "Hierarchy: {} roots, root probability {}, {} attempts",
                config.hierarchy.root_count,
                config.hierarchy.root_probability,
                config.hierarchy.max_attempts
            );
            println!(
                "On-call: {}..={} shifts/day, {}..={} hours, start {:02}..={:02}h, minutes {:?}",
                config.oncall.min_shifts_per_day,
                config.oncall.max_shifts_per_day,
                config.oncall.min_hours,
                config.oncall.max_hours,
                config.oncall.start_hour_min,
                config.oncall.start_hour_max,
                config.oncall.minute_offsets
            );
            println!("Dates: {} to {}", config.dates.min, config.dates.max);
        }
        Ok(())
    }

    /// Validate configuration and report any issues
    pub fn validate_config(config: &Configuration) -> Result<()> {
        log::info!("Validating configuration...");

        config.validate().context("Invalid configuration")?;

        log::info!("✅ Configuration validation passed");
        Ok(())
    }

    /// Handle commands that don't run the generator
    pub fn handle_common_command(command: &CommonCommands, config: &Configuration) -> Result<bool> {
        match command {
            CommonCommands::Config { json } => {
                display_config(config, *json)?;
                Ok(true)
            }
            CommonCommands::Validate => {
                validate_config(config)?;
                Ok(true)
            }
            CommonCommands::Version => {
                println!("{}", version_info());
                Ok(true)
            }
            CommonCommands::Generate => Ok(false),
        }
    }

    /// Standard version information
    pub fn version_info() -> String {
        format!(
            "{} {} ({})",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            env!("CARGO_PKG_RUST_VERSION")
        )
    }
}
