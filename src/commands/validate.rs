use crate::core::Error;
use crate::formatting::{FormattingConfig, Styler};
use crate::knowledge::{self, KnowledgeBaseStats};
use anyhow::Result;
use std::io::Write;
use std::path::Path;

/// Load and integrity-check a knowledge base, printing a summary.
///
/// Returns an error (and so a non-zero exit status) on any violation; every
/// violation is listed first.
pub fn validate_knowledge_base(dir: Option<&Path>) -> Result<()> {
    let styler = Styler::new(FormattingConfig::from_env());
    let source = dir.map_or_else(|| "built-in knowledge base".to_string(), |d| d.display().to_string());
    let mut out = std::io::stdout().lock();

    match knowledge::load(dir) {
        Ok(kb) => {
            writeln!(out, "{} {source}", styler.header("Knowledge base OK:"))?;
            write_stats(&mut out, &kb.stats())?;
            Ok(())
        }
        Err(Error::Integrity(violations)) => {
            writeln!(
                out,
                "{} {source}: {} violation(s)",
                styler.critical("Knowledge base invalid:"),
                violations.len()
            )?;
            for violation in &violations {
                writeln!(out, "  - {violation}")?;
            }
            anyhow::bail!("{} integrity violation(s) in {source}", violations.len())
        }
        Err(e) => Err(anyhow::Error::new(e).context(format!("Failed to load {source}"))),
    }
}

pub(crate) fn write_stats(out: &mut impl Write, stats: &KnowledgeBaseStats) -> Result<()> {
    writeln!(out, "  conditions:     {}", stats.conditions)?;
    writeln!(out, "  symptoms:       {}", stats.symptoms)?;
    writeln!(out, "  synonyms:       {}", stats.synonyms)?;
    writeln!(
        out,
        "  edges:          {} ({} critical)",
        stats.edges, stats.critical_edges
    )?;
    writeln!(out, "  patterns:       {}", stats.patterns)?;
    Ok(())
}
