use anyhow::Result;
use clap::Parser;
use symptomap::cli::{Cli, Commands};
use symptomap::commands::{self, BatchConfig, ScoreConfig};
use symptomap::observability::init_tracing;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.command.verbosity());

    match cli.command {
        Commands::Score {
            phrases,
            text,
            age,
            chronic,
            kb,
            config,
            format,
            output,
            triage,
            plain,
            verbosity,
        } => commands::run_score(ScoreConfig {
            phrases,
            text,
            age,
            chronic,
            kb,
            config,
            format: format.map(Into::into),
            output,
            triage,
            plain,
            verbosity,
        }),
        Commands::Batch {
            input,
            kb,
            config,
            output,
            triage,
            jobs,
            ..
        } => commands::run_batch(BatchConfig {
            input,
            kb,
            config,
            output,
            triage,
            jobs,
        }),
        Commands::Validate { kb, .. } => {
            commands::validate_knowledge_base(kb.as_deref())
        }
        Commands::Init { force } => commands::init_config(force),
    }
}
