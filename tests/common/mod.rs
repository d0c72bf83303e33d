// Shared fixtures for symptomap integration tests
#![allow(dead_code)]

use indoc::indoc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use symptomap::core::DocumentFormat;
use symptomap::knowledge::loader::parse_document;
use symptomap::knowledge::KnowledgeBase;
use symptomap::DiseaseScorer;

pub const FIXTURE_CONDITIONS: &str = indoc! {r#"
    [[condition]]
    name = "Common Cold"
    prevalence = "very_common"
    department = "General Medicine"
    patterns = [{ name = "coryza", symptoms = ["runny nose", "sore throat"] }]

    [[condition]]
    name = "Influenza"
    prevalence = "common"
    patterns = [{ name = "flu triad", symptoms = ["fever", "body ache", "cough"] }]

    [[condition]]
    name = "Pneumonia"
    prevalence = "uncommon"
    age_group = "65+"
    department = "Pulmonology"
    chronic_affinities = ["copd"]

    [[condition]]
    name = "Heart Attack"
    prevalence = "rare"
    department = "Cardiology"

    [[condition]]
    name = "Strep Throat"
    prevalence = "uncommon"

    [[condition]]
    name = "Hay Fever"
    prevalence = "uncommon"

    [[condition]]
    name = "Conjunctivitis"
    prevalence = "uncommon"

    [[edge]]
    condition = "Common Cold"
    symptom = "runny nose"
    weight = 0.9

    [[edge]]
    condition = "Common Cold"
    symptom = "sore throat"
    weight = 0.85

    [[edge]]
    condition = "Common Cold"
    symptom = "cough"
    weight = 0.6

    [[edge]]
    condition = "Influenza"
    symptom = "fever"
    weight = 0.9

    [[edge]]
    condition = "Influenza"
    symptom = "cough"
    weight = 0.7

    [[edge]]
    condition = "Influenza"
    symptom = "body ache"
    weight = 0.8

    [[edge]]
    condition = "Pneumonia"
    symptom = "fever"
    weight = 0.7

    [[edge]]
    condition = "Pneumonia"
    symptom = "cough"
    weight = 0.8

    [[edge]]
    condition = "Pneumonia"
    symptom = "shortness of breath"
    weight = 0.8
    critical = true

    [[edge]]
    condition = "Heart Attack"
    symptom = "chest pain"
    weight = 0.95
    critical = true

    [[edge]]
    condition = "Heart Attack"
    symptom = "shortness of breath"
    weight = 0.6
    critical = true

    [[edge]]
    condition = "Heart Attack"
    symptom = "sweating"
    weight = 0.5

    [[edge]]
    condition = "Strep Throat"
    symptom = "sore throat"
    weight = 0.9

    [[edge]]
    condition = "Strep Throat"
    symptom = "fever"
    weight = 0.6

    [[edge]]
    condition = "Hay Fever"
    symptom = "itchy eyes"
    weight = 0.5

    [[edge]]
    condition = "Conjunctivitis"
    symptom = "itchy eyes"
    weight = 0.5
"#};

pub const FIXTURE_SYNONYMS: &str = indoc! {r#"
    [[symptom]]
    name = "runny nose"
    synonyms = ["rhinorrhea", "nasal discharge"]

    [[symptom]]
    name = "sore throat"
    synonyms = ["throat pain"]

    [[symptom]]
    name = "cough"

    [[symptom]]
    name = "fever"
    synonyms = ["high temperature", "pyrexia"]

    [[symptom]]
    name = "body ache"
    synonyms = ["myalgia"]

    [[symptom]]
    name = "shortness of breath"
    synonyms = ["breathlessness"]

    [[symptom]]
    name = "chest pain"

    [[symptom]]
    name = "sweating"

    [[symptom]]
    name = "itchy eyes"
"#};

pub fn fixture_kb() -> Arc<KnowledgeBase> {
    kb_from_toml(FIXTURE_CONDITIONS, FIXTURE_SYNONYMS)
}

/// Build a knowledge base from inline TOML documents
pub fn kb_from_toml(conditions: &str, synonyms: &str) -> Arc<KnowledgeBase> {
    let conditions = parse_document(
        conditions,
        DocumentFormat::Toml,
        Path::new("fixture/conditions.toml"),
    )
    .expect("fixture conditions parse");
    let synonyms = parse_document(
        synonyms,
        DocumentFormat::Toml,
        Path::new("fixture/synonyms.toml"),
    )
    .expect("fixture synonyms parse");
    Arc::new(KnowledgeBase::from_documents(conditions, synonyms).expect("fixture is consistent"))
}

pub fn fixture_scorer() -> DiseaseScorer {
    DiseaseScorer::with_defaults(fixture_kb())
}

/// Write the fixture knowledge base into `dir` as TOML documents
pub fn write_fixture_kb(dir: &Path) -> PathBuf {
    std::fs::write(dir.join("conditions.toml"), FIXTURE_CONDITIONS).expect("write conditions");
    std::fs::write(dir.join("synonyms.toml"), FIXTURE_SYNONYMS).expect("write synonyms");
    dir.to_path_buf()
}
