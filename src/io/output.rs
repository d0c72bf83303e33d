use crate::formatting::{FormattingConfig, Styler};
use crate::report::{RankedCondition, ReportAnalysis, ScoreReport};
use crate::triage::TriageAssessment;
use comfy_table::presets::{ASCII_MARKDOWN, UTF8_FULL};
use comfy_table::{CellAlignment, ContentArrangement, Table};
use serde::Serialize;
use std::io::Write;

pub const DISCLAIMER: &str =
    "Advisory ranking only. This is not a diagnosis; consult a healthcare professional.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "markdown" | "md" => Some(Self::Markdown),
            "terminal" => Some(Self::Terminal),
            _ => None,
        }
    }
}

/// A report with its optional triage, as serialized to JSON.
#[derive(Debug, Serialize)]
pub struct ReportEnvelope<'a> {
    #[serde(flatten)]
    pub report: &'a ScoreReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triage: Option<&'a TriageAssessment>,
}

pub trait OutputWriter {
    fn write_report(
        &mut self,
        report: &ScoreReport,
        triage: Option<&TriageAssessment>,
    ) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write any serializable value as pretty JSON followed by a newline
    pub fn write_value<T: Serialize + ?Sized>(&mut self, value: &T) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(
        &mut self,
        report: &ScoreReport,
        triage: Option<&TriageAssessment>,
    ) -> anyhow::Result<()> {
        self.write_value(&ReportEnvelope { report, triage })
    }
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_ranking(&mut self, report: &ScoreReport) -> anyhow::Result<()> {
        writeln!(self.writer, "## Candidate Conditions")?;
        writeln!(self.writer)?;

        if report.ranked.is_empty() {
            writeln!(
                self.writer,
                "No condition could be suggested from the given symptoms."
            )?;
            writeln!(self.writer)?;
            return Ok(());
        }

        writeln!(
            self.writer,
            "| Rank | Condition | Likelihood | Matched Symptoms | Critical | Department |"
        )?;
        writeln!(
            self.writer,
            "|------|-----------|------------|------------------|----------|------------|"
        )?;
        for (idx, entry) in report.ranked.iter().enumerate() {
            writeln!(
                self.writer,
                "| {} | {} | {:.1}% | {} | {} | {} |",
                idx + 1,
                entry.condition,
                entry.probability,
                entry.matched_symptoms.join(", "),
                if entry.critical { "yes" } else { "no" },
                entry.department.as_deref().unwrap_or("-"),
            )?;
        }
        writeln!(self.writer)?;

        let critical: Vec<&RankedCondition> = report
            .ranked
            .iter()
            .filter(|r| !r.unmatched_critical_symptoms.is_empty())
            .collect();
        if !critical.is_empty() {
            writeln!(self.writer, "### Critical Symptoms to Watch For")?;
            writeln!(self.writer)?;
            for entry in critical {
                writeln!(
                    self.writer,
                    "- **{}**: {}",
                    entry.condition,
                    entry.unmatched_critical_symptoms.join(", ")
                )?;
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn write_analysis(&mut self, analysis: &ReportAnalysis) -> anyhow::Result<()> {
        writeln!(self.writer, "## Analysis")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", analysis.summary)?;
        writeln!(self.writer)?;
        writeln!(self.writer, "- {}", analysis.symptom_analysis)?;
        writeln!(self.writer, "- Confidence: {}", analysis.confidence_level)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_interpretation(&mut self, report: &ScoreReport) -> anyhow::Result<()> {
        if report.interpretations.is_empty() {
            return Ok(());
        }
        writeln!(self.writer, "## Symptom Interpretation")?;
        writeln!(self.writer)?;
        for item in &report.interpretations {
            match &item.canonical {
                Some(canonical) => writeln!(
                    self.writer,
                    "- \"{}\" -> {} ({:.2})",
                    item.phrase, canonical, item.similarity
                )?,
                None => writeln!(self.writer, "- \"{}\" -> could not interpret", item.phrase)?,
            }
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_triage(&mut self, triage: &TriageAssessment) -> anyhow::Result<()> {
        writeln!(self.writer, "## Triage: {}", triage.level.label().to_uppercase())?;
        writeln!(self.writer)?;
        writeln!(self.writer, "Department: {}", triage.department)?;
        writeln!(self.writer)?;
        for reason in &triage.reasons {
            writeln!(self.writer, "- {reason}")?;
        }
        if !triage.reasons.is_empty() {
            writeln!(self.writer)?;
        }
        writeln!(self.writer, "### Recommendations")?;
        writeln!(self.writer)?;
        for item in &triage.recommendations {
            writeln!(self.writer, "- {item}")?;
        }
        writeln!(self.writer)?;
        writeln!(self.writer, "### Follow-up Questions")?;
        writeln!(self.writer)?;
        for question in &triage.follow_up_questions {
            writeln!(self.writer, "- {question}")?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_report(
        &mut self,
        report: &ScoreReport,
        triage: Option<&TriageAssessment>,
    ) -> anyhow::Result<()> {
        writeln!(self.writer, "# Symptom Assessment")?;
        writeln!(self.writer)?;
        self.write_ranking(report)?;
        if let Some(analysis) = &report.analysis {
            self.write_analysis(analysis)?;
        }
        self.write_interpretation(report)?;
        if let Some(triage) = triage {
            self.write_triage(triage)?;
        }
        writeln!(self.writer, "_{DISCLAIMER}_")?;
        self.writer.flush()?;
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
    styler: Styler,
    verbose: bool,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W, formatting: FormattingConfig) -> Self {
        Self {
            writer,
            styler: Styler::new(formatting),
            verbose: false,
        }
    }

    /// Also print each condition's score breakdown
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn ranking_table(&self, report: &ScoreReport) -> Table {
        let mut table = Table::new();
        table
            .load_preset(if self.styler.enabled() { UTF8_FULL } else { ASCII_MARKDOWN })
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["#", "Condition", "Likelihood", "Matched", "Critical"]);

        for (idx, entry) in report.ranked.iter().enumerate() {
            table.add_row(vec![
                (idx + 1).to_string(),
                entry.condition.clone(),
                format!("{:.1}%", entry.probability),
                entry.matched_symptoms.join(", "),
                if entry.critical { "yes".to_string() } else { String::new() },
            ]);
        }
        if let Some(column) = table.column_mut(2) {
            column.set_cell_alignment(CellAlignment::Right);
        }
        table
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(
        &mut self,
        report: &ScoreReport,
        triage: Option<&TriageAssessment>,
    ) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", self.styler.header("Candidate conditions"))?;

        if report.ranked.is_empty() {
            writeln!(
                self.writer,
                "Cannot suggest a condition from the given symptoms."
            )?;
        } else {
            let table = self.ranking_table(report);
            writeln!(self.writer, "{table}")?;
            if let Some(top) = report.top() {
                writeln!(
                    self.writer,
                    "Most likely: {} at {}",
                    top.condition,
                    self.styler.probability(top.probability)
                )?;
            }
            if let Some(analysis) = &report.analysis {
                writeln!(
                    self.writer,
                    "{} Confidence: {}",
                    analysis.symptom_analysis, analysis.confidence_level
                )?;
            }
            for entry in report.ranked.iter().filter(|r| r.critical) {
                writeln!(
                    self.writer,
                    "{} {} matched a critical symptom",
                    self.styler.critical("!"),
                    entry.condition
                )?;
            }
            if self.verbose {
                for entry in &report.ranked {
                    writeln!(
                        self.writer,
                        "  {}: {}",
                        entry.condition,
                        self.styler.dim(&entry.breakdown.explain())
                    )?;
                }
            }
        }

        if !report.unmatched_phrases.is_empty() {
            writeln!(
                self.writer,
                "{} {}",
                self.styler.warning("Could not interpret:"),
                report.unmatched_phrases.join(", ")
            )?;
        }

        if let Some(triage) = triage {
            writeln!(self.writer)?;
            writeln!(
                self.writer,
                "{} {}  ({})",
                self.styler.header("Triage:"),
                self.styler.urgency(triage.level),
                triage.department
            )?;
            for reason in &triage.reasons {
                writeln!(self.writer, "  - {reason}")?;
            }
            for item in &triage.recommendations {
                writeln!(self.writer, "  * {item}")?;
            }
            for question in &triage.follow_up_questions {
                writeln!(self.writer, "  ? {question}")?;
            }
        }

        writeln!(self.writer)?;
        writeln!(self.writer, "{}", self.styler.dim(DISCLAIMER))?;
        self.writer.flush()?;
        Ok(())
    }
}

pub fn create_writer<'a>(
    format: OutputFormat,
    writer: Box<dyn Write + 'a>,
    formatting: FormattingConfig,
    verbose: bool,
) -> Box<dyn OutputWriter + 'a> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(writer)),
        OutputFormat::Terminal => {
            Box::new(TerminalWriter::new(writer, formatting).verbose(verbose))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Severity;
    use crate::matching::MatchMethod;
    use crate::report::{ConfidenceLevel, ReportAnalysis, SymptomInterpretation};
    use crate::scoring::ScoreBreakdown;
    use crate::triage::{assess, TriageRules};

    fn sample_report() -> ScoreReport {
        ScoreReport {
            ranked: vec![RankedCondition {
                condition: "Common Cold".to_string(),
                probability: 95.0,
                raw_score: 8.75,
                confidence: 73.3,
                matched_symptoms: vec!["runny nose".to_string(), "sore throat".to_string()],
                critical: false,
                critical_symptom_count: 0,
                unmatched_critical_symptoms: Vec::new(),
                department: Some("General Medicine".to_string()),
                description: None,
                breakdown: ScoreBreakdown::new(1.75, 2.0).with_pattern(2.5, "coryza"),
            }],
            unmatched_phrases: vec!["purple elbows".to_string()],
            interpretations: vec![
                SymptomInterpretation {
                    phrase: "runny nose".to_string(),
                    canonical: Some("runny nose".to_string()),
                    similarity: 1.0,
                    method: Some(MatchMethod::Exact),
                    severity: Severity::Unspecified,
                },
                SymptomInterpretation {
                    phrase: "purple elbows".to_string(),
                    canonical: None,
                    similarity: 0.3,
                    method: None,
                    severity: Severity::Unspecified,
                },
            ],
            analysis: Some(ReportAnalysis {
                summary: "Common Cold is the most likely condition (95.0%).".to_string(),
                symptom_analysis: "Matched 2 out of 3 reported symptoms.".to_string(),
                confidence_level: ConfidenceLevel::High,
            }),
        }
    }

    #[test]
    fn test_json_writer_flattens_report() {
        let mut buffer = Vec::new();
        JsonWriter::new(&mut buffer)
            .write_report(&sample_report(), None)
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["ranked"][0]["condition"], "Common Cold");
        assert_eq!(value["unmatched_phrases"][0], "purple elbows");
        assert!(value.get("triage").is_none());
        assert_eq!(value["ranked"][0]["confidence"], 73.3);
        assert_eq!(value["analysis"]["confidence_level"], "high");
    }

    #[test]
    fn test_json_writer_includes_triage() {
        let report = sample_report();
        let triage = assess(&report, &TriageRules::default());
        let mut buffer = Vec::new();
        JsonWriter::new(&mut buffer)
            .write_report(&report, Some(&triage))
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["triage"]["level"], "gp");
    }

    #[test]
    fn test_markdown_writer() {
        let mut buffer = Vec::new();
        MarkdownWriter::new(&mut buffer)
            .write_report(&sample_report(), None)
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("# Symptom Assessment"));
        assert!(text.contains("| 1 | Common Cold | 95.0% | runny nose, sore throat | no | General Medicine |"));
        assert!(text.contains("\"purple elbows\" -> could not interpret"));
        assert!(text.contains("## Analysis"));
        assert!(text.contains("- Confidence: High"));
    }

    #[test]
    fn test_terminal_writer_plain() {
        let mut buffer = Vec::new();
        TerminalWriter::new(&mut buffer, FormattingConfig::plain())
            .verbose(true)
            .write_report(&sample_report(), None)
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("Common Cold"));
        assert!(text.contains("Most likely: Common Cold at 95.0%"));
        assert!(text.contains("Matched 2 out of 3 reported symptoms. Confidence: High"));
        assert!(text.contains("Could not interpret: purple elbows"));
        assert!(text.contains("pattern 2.5 (coryza)"));
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse("MD"), Some(OutputFormat::Markdown));
        assert_eq!(OutputFormat::parse("yaml"), None);
    }
}
