use crate::config::{resolve_config, SymptomapConfig};
use crate::core::{PatientContext, Query};
use crate::formatting::FormattingConfig;
use crate::io::{self, OutputFormat};
use crate::scoring::DiseaseScorer;
use crate::triage;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::warn;

pub struct ScoreConfig {
    pub phrases: Vec<String>,
    pub text: Option<String>,
    pub age: Option<u32>,
    pub chronic: Vec<String>,
    pub kb: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub output: Option<PathBuf>,
    pub triage: bool,
    pub plain: bool,
    pub verbosity: u8,
}

impl ScoreConfig {
    fn query(&self) -> Query {
        let patient = PatientContext {
            age: self.age,
            chronic_conditions: self
                .chronic
                .iter()
                .map(|c| c.trim())
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect(),
        };
        Query {
            symptoms: self.phrases.clone(),
            text: self.text.clone(),
            patient: (!patient.is_empty()).then_some(patient),
        }
    }
}

pub fn run_score(config: ScoreConfig) -> Result<()> {
    if config.phrases.is_empty() && config.text.is_none() {
        anyhow::bail!("No symptoms given. Pass phrases as arguments or use --text.");
    }

    let settings = resolve_config(config.config.as_deref()).context("Failed to load configuration")?;
    let kb = super::load_knowledge_base(config.kb.as_deref())?;
    let scorer = DiseaseScorer::from_config(kb, &settings);

    let report = scorer.score_query(&config.query());
    let assessment = config
        .triage
        .then(|| triage::assess(&report, &settings.triage()));

    let format = resolve_format(config.format, &settings);
    let formatting = if config.plain || config.output.is_some() {
        FormattingConfig::plain()
    } else {
        FormattingConfig::from_env().with_preference(settings.output().use_color)
    };

    let destination = io::open_destination(config.output.as_deref())?;
    let mut writer = io::create_writer(format, destination, formatting, config.verbosity > 0);
    writer.write_report(&report, assessment.as_ref())?;

    if let Some(path) = &config.output {
        eprintln!("Report written to {}", path.display());
    }
    Ok(())
}

/// Command line flag wins, then `[output] default_format`, then terminal
pub(crate) fn resolve_format(flag: Option<OutputFormat>, settings: &SymptomapConfig) -> OutputFormat {
    if let Some(format) = flag {
        return format;
    }
    match settings.output().default_format.as_deref() {
        None => OutputFormat::Terminal,
        Some(name) => OutputFormat::parse(name).unwrap_or_else(|| {
            warn!(format = name, "unknown default_format in config, using terminal");
            OutputFormat::Terminal
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputConfig;

    fn config_with_format(format: &str) -> SymptomapConfig {
        SymptomapConfig {
            output: Some(OutputConfig {
                default_format: Some(format.to_string()),
                use_color: None,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_format_resolution_order() {
        let settings = config_with_format("markdown");
        assert_eq!(
            resolve_format(Some(OutputFormat::Json), &settings),
            OutputFormat::Json
        );
        assert_eq!(resolve_format(None, &settings), OutputFormat::Markdown);
        assert_eq!(
            resolve_format(None, &config_with_format("html")),
            OutputFormat::Terminal
        );
        assert_eq!(
            resolve_format(None, &SymptomapConfig::default()),
            OutputFormat::Terminal
        );
    }

    #[test]
    fn test_query_from_arguments() {
        let config = ScoreConfig {
            phrases: vec!["fever".into()],
            text: None,
            age: Some(30),
            chronic: vec![" asthma ".into(), "".into()],
            kb: None,
            config: None,
            format: None,
            output: None,
            triage: false,
            plain: true,
            verbosity: 0,
        };
        let query = config.query();
        let patient = query.patient.unwrap();
        assert_eq!(patient.age, Some(30));
        assert_eq!(patient.chronic_conditions.len(), 1);
        assert!(patient.chronic_conditions.contains("asthma"));
    }
}
