use super::base::KnowledgeBase;
use super::document::{ConditionsDocument, SynonymsDocument};
use crate::core::{DocumentFormat, Error, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONDITIONS_STEM: &str = "conditions";
pub const SYNONYMS_STEM: &str = "synonyms";

const BUILTIN_CONDITIONS: &str = include_str!("../../data/conditions.toml");
const BUILTIN_SYNONYMS: &str = include_str!("../../data/synonyms.toml");

/// Pure function to deserialize a document in the given format
pub fn parse_document<T: DeserializeOwned>(
    contents: &str,
    format: DocumentFormat,
    path: &Path,
) -> Result<T> {
    let parsed = match format {
        DocumentFormat::Toml => toml::from_str(contents).map_err(|e| e.to_string()),
        DocumentFormat::Json => serde_json::from_str(contents).map_err(|e| e.to_string()),
        DocumentFormat::Yaml => serde_yaml::from_str(contents).map_err(|e| e.to_string()),
    };
    parsed.map_err(|message| Error::parse(format, path, message))
}

/// Read and parse a single document, detecting its format from the extension
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format =
        DocumentFormat::from_path(path).ok_or_else(|| Error::UnsupportedFormat(path.into()))?;
    let contents = fs::read_to_string(path)
        .map_err(|e| Error::file_system("Failed to read knowledge base document", path, e))?;
    debug!(path = %path.display(), %format, "reading knowledge base document");
    parse_document(&contents, format, path)
}

/// Locate `<stem>.{toml,json,yaml,yml}` inside `dir`.
///
/// More than one candidate for the same stem is rejected rather than picking one silently.
pub fn find_document(dir: &Path, stem: &str) -> Result<PathBuf> {
    let candidates: Vec<PathBuf> = DocumentFormat::ALL_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{stem}.{ext}")))
        .filter(|path| path.is_file())
        .collect();

    match candidates.as_slice() {
        [single] => Ok(single.clone()),
        [] => Err(Error::FileSystem {
            message: format!(
                "No {stem} document ({stem}.toml, .json, .yaml or .yml) in {}",
                dir.display()
            ),
            path: Some(dir.to_path_buf()),
            source: None,
        }),
        _ => Err(Error::Configuration(format!(
            "Multiple {stem} documents in {}: {}",
            dir.display(),
            candidates
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

/// Load and integrity-check the knowledge base stored in `dir`
pub fn load_from_dir(dir: &Path) -> Result<KnowledgeBase> {
    let conditions_path = find_document(dir, CONDITIONS_STEM)?;
    let synonyms_path = find_document(dir, SYNONYMS_STEM)?;

    let conditions: ConditionsDocument = read_document(&conditions_path)?;
    let synonyms: SynonymsDocument = read_document(&synonyms_path)?;

    KnowledgeBase::from_documents(conditions, synonyms)
}

/// Load the knowledge base shipped inside the binary
pub fn load_builtin() -> Result<KnowledgeBase> {
    let conditions = parse_document(
        BUILTIN_CONDITIONS,
        DocumentFormat::Toml,
        Path::new("<builtin>/conditions.toml"),
    )?;
    let synonyms = parse_document(
        BUILTIN_SYNONYMS,
        DocumentFormat::Toml,
        Path::new("<builtin>/synonyms.toml"),
    )?;
    KnowledgeBase::from_documents(conditions, synonyms)
}

/// Load from `dir` when given, else the built-in knowledge base
pub fn load(dir: Option<&Path>) -> Result<KnowledgeBase> {
    match dir {
        Some(dir) => load_from_dir(dir),
        None => load_builtin(),
    }
}
