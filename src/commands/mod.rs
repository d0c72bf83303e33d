//! Command handlers behind the `symptomap` binary.
//!
//! - **score**: rank conditions for one query
//! - **batch**: score a JSON array of queries in parallel
//! - **validate**: integrity-check a knowledge base
//! - **init**: write a default configuration file

pub mod batch;
pub mod init;
pub mod score;
pub mod validate;

pub use batch::{run_batch, BatchConfig};
pub use init::init_config;
pub use score::{run_score, ScoreConfig};
pub use validate::validate_knowledge_base;

use crate::knowledge::{self, KnowledgeBase};
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

/// Load the named knowledge base directory, or the built-in one
pub(crate) fn load_knowledge_base(dir: Option<&Path>) -> Result<Arc<KnowledgeBase>> {
    let kb = knowledge::load(dir).with_context(|| match dir {
        Some(dir) => format!("Failed to load knowledge base from {}", dir.display()),
        None => "Failed to load the built-in knowledge base".to_string(),
    })?;
    Ok(Arc::new(kb))
}
