use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use common::cli::{CommonArgs, CommonCommands, GenerateArgs, utils};
use generator::DatasetBuilder;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use writer::SqlEmitter;

#[derive(Parser)]
#[command(name = "staffgen")]
#[command(about = "staffgen - synthetic personnel dataset generator emitting SQL inserts")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    generate: GenerateArgs,

    #[command(subcommand)]
    command: Option<StaffgenCommands>,
}

#[derive(Subcommand)]
enum StaffgenCommands {
    #[command(flatten)]
    Common(CommonCommands),
}

impl Default for StaffgenCommands {
    fn default() -> Self {
        Self::Common(CommonCommands::Generate)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    utils::init_logging(&cli.common);

    let mut config = utils::load_config(cli.common.config.as_ref())?;
    cli.generate.apply(&mut config);

    let command = cli.command.unwrap_or_default();
    let StaffgenCommands::Common(ref common_cmd) = command;
    if utils::handle_common_command(common_cmd, &config)? {
        return Ok(());
    }

    utils::validate_config(&config)?;

    let seed = config.employees.seed.unwrap_or_else(rand::random);
    log::info!(
        "Generator starting with employees={}, outdir={}, seed={seed}",
        config.employees.count,
        config.output.dir
    );

    let mut rng = SmallRng::seed_from_u64(seed);
    let dataset = DatasetBuilder::new(&config)
        .build(&mut rng)
        .context("Failed to generate dataset")?;

    let emitted = SqlEmitter::from(&config.output)
        .emit(&dataset)
        .context("Failed to write SQL files")?;

    println!("Files written:");
    for (table, path) in &emitted.files {
        println!(" - {table}: {}", path.display());
    }
    let counts = serde_json::to_string_pretty(&dataset.counts())
        .context("Failed to serialize row counts")?;
    println!("Row counts: {counts}");
    println!("Done. You can import the SQL files into PostgreSQL.");

    Ok(())
}
