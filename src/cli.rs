use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "symptomap")]
#[command(about = "Rank candidate conditions from reported symptoms", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score a single set of symptoms
    Score {
        /// Symptom phrases, one per argument
        phrases: Vec<String>,

        /// Free-text description, split into phrases on commas, "and", "with"...
        #[arg(long)]
        text: Option<String>,

        /// Patient age in years
        #[arg(long)]
        age: Option<u32>,

        /// Patient chronic conditions (comma-separated)
        #[arg(long, value_delimiter = ',')]
        chronic: Vec<String>,

        /// Knowledge base directory (defaults to the built-in knowledge base)
        #[arg(long)]
        kb: Option<PathBuf>,

        /// Configuration file (defaults to discovering .symptomap.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Include a rule-based triage assessment
        #[arg(long)]
        triage: bool,

        /// Disable colors
        #[arg(long)]
        plain: bool,

        /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
        /// -v: Show score breakdowns
        /// -vv: Log match decisions
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Score a JSON array of queries in parallel
    Batch {
        /// JSON file: [{"symptoms": [...], "text": "...", "patient": {...}}, ...]
        input: PathBuf,

        #[arg(long)]
        kb: Option<PathBuf>,

        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Attach a triage assessment to every report
        #[arg(long)]
        triage: bool,

        /// Number of worker threads (0 = all cores)
        #[arg(short = 'j', long = "jobs", default_value = "0")]
        jobs: usize,

        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Load a knowledge base and report integrity problems
    Validate {
        /// Knowledge base directory (defaults to the built-in knowledge base)
        #[arg(long)]
        kb: Option<PathBuf>,

        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Write a default .symptomap.toml in the current directory
    Init {
        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },
}

impl Commands {
    pub fn verbosity(&self) -> u8 {
        match self {
            Self::Score { verbosity, .. }
            | Self::Batch { verbosity, .. }
            | Self::Validate { verbosity, .. } => *verbosity,
            Self::Init { .. } => 0,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

impl From<OutputFormat> for crate::io::output::OutputFormat {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Json => crate::io::output::OutputFormat::Json,
            OutputFormat::Markdown => crate::io::output::OutputFormat::Markdown,
            OutputFormat::Terminal => crate::io::output::OutputFormat::Terminal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_score_command() {
        let cli = Cli::try_parse_from([
            "symptomap",
            "score",
            "fever",
            "cough",
            "--age",
            "70",
            "--chronic",
            "asthma,diabetes",
            "--format",
            "json",
            "-vv",
        ])
        .unwrap();

        match cli.command {
            Commands::Score {
                ref phrases,
                age,
                ref chronic,
                format,
                verbosity,
                ..
            } => {
                assert_eq!(phrases, &["fever", "cough"]);
                assert_eq!(age, Some(70));
                assert_eq!(chronic, &["asthma", "diabetes"]);
                assert_eq!(format, Some(OutputFormat::Json));
                assert_eq!(verbosity, 2);
            }
            _ => panic!("Expected Score command"),
        }
        assert_eq!(cli.command.verbosity(), 2);
    }

    #[test]
    fn test_parse_batch_jobs() {
        let cli = Cli::try_parse_from(["symptomap", "batch", "queries.json", "-j", "4"]).unwrap();
        match cli.command {
            Commands::Batch { input, jobs, .. } => {
                assert_eq!(input, PathBuf::from("queries.json"));
                assert_eq!(jobs, 4);
            }
            _ => panic!("Expected Batch command"),
        }
    }

    #[test]
    fn test_rejects_negative_age() {
        assert!(Cli::try_parse_from(["symptomap", "score", "fever", "--age", "-3"]).is_err());
    }

    #[test]
    fn test_output_format_conversion() {
        assert_eq!(
            crate::io::output::OutputFormat::from(OutputFormat::Markdown),
            crate::io::output::OutputFormat::Markdown
        );
    }
}
