use crate::config::resolve_config;
use crate::core::Query;
use crate::io::{self, JsonWriter, ReportEnvelope};
use crate::report::ScoreReport;
use crate::scoring::DiseaseScorer;
use crate::triage::{self, TriageAssessment, TriageRules};
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

pub struct BatchConfig {
    pub input: PathBuf,
    pub kb: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub triage: bool,
    pub jobs: usize,
}

pub fn run_batch(config: BatchConfig) -> Result<()> {
    let contents = io::read_file(&config.input)?;
    let queries: Vec<Query> = serde_json::from_str(&contents).with_context(|| {
        format!(
            "{} must contain a JSON array of queries",
            config.input.display()
        )
    })?;

    let settings = resolve_config(config.config.as_deref()).context("Failed to load configuration")?;
    let kb = super::load_knowledge_base(config.kb.as_deref())?;
    let scorer = DiseaseScorer::from_config(kb, &settings);
    let rules = config.triage.then(|| settings.triage());

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.jobs)
        .build()
        .context("Failed to build worker pool")?;

    let start = Instant::now();
    let results = pool.install(|| score_all(&scorer, &queries, rules.as_ref()));
    info!(
        queries = results.len(),
        threads = pool.current_num_threads(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "batch scored"
    );

    let envelopes: Vec<ReportEnvelope> = results
        .iter()
        .map(|(report, triage)| ReportEnvelope {
            report,
            triage: triage.as_ref(),
        })
        .collect();

    let destination = io::open_destination(config.output.as_deref())?;
    JsonWriter::new(destination).write_value(&envelopes)?;
    Ok(())
}

/// Score every query against the shared scorer; results keep input order
pub fn score_all(
    scorer: &DiseaseScorer,
    queries: &[Query],
    rules: Option<&TriageRules>,
) -> Vec<(ScoreReport, Option<TriageAssessment>)> {
    queries
        .par_iter()
        .map(|query| {
            let report = scorer.score_query(query);
            let assessment = rules.map(|rules| triage::assess(&report, rules));
            (report, assessment)
        })
        .collect()
}
