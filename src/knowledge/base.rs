//! The immutable symptom/condition lookup structure.
//!
//! A `KnowledgeBase` is built once from the two source documents and never
//! mutated afterwards. Every scoring request borrows it read-only, so one
//! instance can be shared across threads without locking.

use super::document::{ConditionsDocument, SynonymsDocument};
use crate::core::{normalize_text, AgeTag, Error, IntegrityViolation, PrevalenceClass, Result};
use std::collections::{BTreeSet, HashMap};
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymptomId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConditionId(pub(crate) usize);

/// Canonical symptom with its surface variants.
#[derive(Debug, Clone, PartialEq)]
pub struct Symptom {
    pub name: String,
    pub synonyms: Vec<String>,
}

/// One (condition, symptom) association. Weight is diagnostic specificity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub condition: ConditionId,
    pub symptom: SymptomId,
    pub weight: f64,
    pub critical: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SymptomPattern {
    pub name: String,
    pub symptoms: BTreeSet<SymptomId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub name: String,
    pub prevalence: PrevalenceClass,
    pub age_tag: Option<AgeTag>,
    pub department: Option<String>,
    pub description: Option<String>,
    /// Normalised chronic-condition keywords
    pub chronic_affinities: Vec<String>,
    pub patterns: Vec<SymptomPattern>,
    pub edges: Vec<Edge>,
}

impl Condition {
    pub fn edge_for(&self, symptom: SymptomId) -> Option<&Edge> {
        self.edges.iter().find(|edge| edge.symptom == symptom)
    }

    pub fn critical_symptoms(&self) -> impl Iterator<Item = SymptomId> + '_ {
        self.edges
            .iter()
            .filter(|edge| edge.critical)
            .map(|edge| edge.symptom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnowledgeBaseStats {
    pub conditions: usize,
    pub symptoms: usize,
    pub synonyms: usize,
    pub edges: usize,
    pub critical_edges: usize,
    pub patterns: usize,
}

#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    conditions: Vec<Condition>,
    symptoms: Vec<Symptom>,
    /// Normalised canonical name or synonym -> symptom
    terms: HashMap<String, SymptomId>,
    /// Edges grouped by symptom, the reverse index used while scoring
    edges_by_symptom: Vec<Vec<Edge>>,
    max_weight: Vec<f64>,
}

impl KnowledgeBase {
    /// Build and integrity-check a knowledge base from its two source documents.
    ///
    /// Every violation found is reported together in `Error::Integrity`.
    pub fn from_documents(
        conditions_doc: ConditionsDocument,
        synonyms_doc: SynonymsDocument,
    ) -> Result<Self> {
        let mut violations = Vec::new();

        let (symptoms, terms) = build_symptoms(synonyms_doc, &mut violations);
        let symptom_lookup: HashMap<String, SymptomId> = symptoms
            .iter()
            .enumerate()
            .map(|(idx, s)| (normalize_text(&s.name), SymptomId(idx)))
            .collect();

        let mut conditions = Vec::with_capacity(conditions_doc.conditions.len());
        let mut condition_lookup: HashMap<String, ConditionId> = HashMap::new();
        let mut pending_patterns = Vec::new();

        for record in conditions_doc.conditions {
            let key = normalize_text(&record.name);
            if key.is_empty() {
                violations.push(IntegrityViolation::EmptyName("condition"));
                continue;
            }
            if condition_lookup.contains_key(&key) {
                violations.push(IntegrityViolation::DuplicateCondition(record.name));
                continue;
            }

            let age_tag = match record.age_group.as_deref().map(AgeTag::parse_group) {
                None => None,
                Some(Ok(tag)) => tag,
                Some(Err(_)) => {
                    violations.push(IntegrityViolation::InvalidAgeGroup {
                        condition: record.name.clone(),
                        value: record.age_group.clone().unwrap_or_default(),
                    });
                    None
                }
            };

            let id = ConditionId(conditions.len());
            condition_lookup.insert(key, id);
            pending_patterns.push((id, record.patterns));
            conditions.push(Condition {
                name: record.name.trim().to_string(),
                prevalence: record.prevalence,
                age_tag,
                department: record.department,
                description: record.description,
                chronic_affinities: record
                    .chronic_affinities
                    .iter()
                    .map(|a| normalize_text(a))
                    .filter(|a| !a.is_empty())
                    .collect(),
                patterns: Vec::new(),
                edges: Vec::new(),
            });
        }

        let mut edges_by_symptom = vec![Vec::new(); symptoms.len()];
        for record in conditions_doc.edges {
            let condition = condition_lookup.get(&normalize_text(&record.condition));
            let symptom = symptom_lookup.get(&normalize_text(&record.symptom));

            let (Some(&condition), Some(&symptom)) = (condition, symptom) else {
                if condition.is_none() {
                    violations.push(IntegrityViolation::UndefinedCondition {
                        condition: record.condition.clone(),
                        symptom: record.symptom.clone(),
                    });
                }
                if symptom.is_none() {
                    violations.push(IntegrityViolation::UndefinedSymptom {
                        condition: record.condition,
                        symptom: record.symptom,
                    });
                }
                continue;
            };

            if !record.weight.is_finite() || !(0.0..=1.0).contains(&record.weight) {
                violations.push(IntegrityViolation::WeightOutOfRange {
                    condition: record.condition,
                    symptom: record.symptom,
                    weight: record.weight,
                });
                continue;
            }

            let target = &mut conditions[condition.0];
            if target.edge_for(symptom).is_some() {
                violations.push(IntegrityViolation::DuplicateEdge {
                    condition: record.condition,
                    symptom: record.symptom,
                });
                continue;
            }

            let edge = Edge {
                condition,
                symptom,
                weight: record.weight,
                critical: record.critical,
            };
            target.edges.push(edge);
            edges_by_symptom[symptom.0].push(edge);
        }

        for (condition_id, records) in pending_patterns {
            let condition = &mut conditions[condition_id.0];
            for (idx, record) in records.into_iter().enumerate() {
                let name = record
                    .name
                    .unwrap_or_else(|| format!("pattern {}", idx + 1));
                if record.symptoms.is_empty() {
                    violations.push(IntegrityViolation::EmptyPattern {
                        condition: condition.name.clone(),
                        pattern: name,
                    });
                    continue;
                }

                let mut members = BTreeSet::new();
                let mut valid = true;
                for symptom_name in &record.symptoms {
                    match symptom_lookup.get(&normalize_text(symptom_name)) {
                        Some(&id) if condition.edge_for(id).is_some() => {
                            members.insert(id);
                        }
                        Some(_) => {
                            valid = false;
                            violations.push(IntegrityViolation::PatternSymptomNotLinked {
                                condition: condition.name.clone(),
                                pattern: name.clone(),
                                symptom: symptom_name.clone(),
                            });
                        }
                        None => {
                            valid = false;
                            violations.push(IntegrityViolation::UndefinedSymptom {
                                condition: condition.name.clone(),
                                symptom: symptom_name.clone(),
                            });
                        }
                    }
                }
                if valid {
                    condition.patterns.push(SymptomPattern {
                        name,
                        symptoms: members,
                    });
                }
            }
        }

        if !violations.is_empty() {
            for violation in &violations {
                error!(%violation, "knowledge base integrity violation");
            }
            return Err(Error::Integrity(violations));
        }

        for condition in conditions.iter().filter(|c| c.edges.is_empty()) {
            warn!(
                condition = %condition.name,
                "condition has no symptom edges and can never be ranked"
            );
        }

        let max_weight = edges_by_symptom
            .iter()
            .map(|edges| edges.iter().map(|e| e.weight).fold(0.0, f64::max))
            .collect();

        let kb = Self {
            conditions,
            symptoms,
            terms,
            edges_by_symptom,
            max_weight,
        };

        let stats = kb.stats();
        info!(
            conditions = stats.conditions,
            symptoms = stats.symptoms,
            synonyms = stats.synonyms,
            edges = stats.edges,
            "knowledge base loaded"
        );
        Ok(kb)
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn condition(&self, id: ConditionId) -> &Condition {
        &self.conditions[id.0]
    }

    pub fn find_condition(&self, name: &str) -> Option<&Condition> {
        let key = normalize_text(name);
        self.conditions
            .iter()
            .find(|c| normalize_text(&c.name) == key)
    }

    pub fn symptoms(&self) -> &[Symptom] {
        &self.symptoms
    }

    pub fn symptom(&self, id: SymptomId) -> &Symptom {
        &self.symptoms[id.0]
    }

    pub fn symptom_name(&self, id: SymptomId) -> &str {
        &self.symptoms[id.0].name
    }

    /// Exact lookup of a normalised term (canonical name or synonym).
    pub fn lookup_term(&self, normalized: &str) -> Option<SymptomId> {
        self.terms.get(normalized).copied()
    }

    /// Whether `normalized` is the canonical name (not a synonym) of its symptom.
    pub fn is_canonical_term(&self, normalized: &str) -> bool {
        self.lookup_term(normalized)
            .is_some_and(|id| normalize_text(self.symptom_name(id)) == normalized)
    }

    /// All matchable terms with the symptom each resolves to.
    pub fn terms(&self) -> impl Iterator<Item = (&str, SymptomId)> {
        self.terms.iter().map(|(term, id)| (term.as_str(), *id))
    }

    pub fn edges_for(&self, symptom: SymptomId) -> &[Edge] {
        &self.edges_by_symptom[symptom.0]
    }

    /// Highest weight of the symptom across all conditions, 0 if unlinked.
    pub fn max_weight(&self, symptom: SymptomId) -> f64 {
        self.max_weight[symptom.0]
    }

    pub fn stats(&self) -> KnowledgeBaseStats {
        let edges = self.conditions.iter().map(|c| c.edges.len()).sum();
        let critical_edges = self
            .conditions
            .iter()
            .flat_map(|c| &c.edges)
            .filter(|e| e.critical)
            .count();
        KnowledgeBaseStats {
            conditions: self.conditions.len(),
            symptoms: self.symptoms.len(),
            synonyms: self.symptoms.iter().map(|s| s.synonyms.len()).sum(),
            edges,
            critical_edges,
            patterns: self.conditions.iter().map(|c| c.patterns.len()).sum(),
        }
    }
}

fn build_symptoms(
    doc: SynonymsDocument,
    violations: &mut Vec<IntegrityViolation>,
) -> (Vec<Symptom>, HashMap<String, SymptomId>) {
    let mut symptoms: Vec<Symptom> = Vec::with_capacity(doc.symptoms.len());
    let mut terms: HashMap<String, SymptomId> = HashMap::new();

    // Canonical names claim their terms before any synonym does.
    let mut accepted = Vec::new();
    for record in doc.symptoms {
        let key = normalize_text(&record.name);
        if key.is_empty() {
            violations.push(IntegrityViolation::EmptyName("symptom"));
            continue;
        }
        if terms.contains_key(&key) {
            violations.push(IntegrityViolation::DuplicateSymptom(record.name));
            continue;
        }
        let id = SymptomId(symptoms.len());
        terms.insert(key, id);
        symptoms.push(Symptom {
            name: record.name.trim().to_string(),
            synonyms: Vec::new(),
        });
        accepted.push((id, record.synonyms));
    }

    for (id, synonyms) in accepted {
        for synonym in synonyms {
            let key = normalize_text(&synonym);
            if key.is_empty() {
                continue;
            }
            match terms.get(&key) {
                Some(&existing) if existing == id => {}
                Some(&existing) => violations.push(IntegrityViolation::AmbiguousSynonym {
                    synonym,
                    first: symptoms[existing.0].name.clone(),
                    second: symptoms[id.0].name.clone(),
                }),
                None => {
                    terms.insert(key, id);
                    symptoms[id.0].synonyms.push(synonym.trim().to_string());
                }
            }
        }
    }

    (symptoms, terms)
}
