//! Batch checking of candidate values against declared constraints

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::ConstraintError;
use crate::parser::{parse_type_with, ParseOptions};
use crate::source::{ConstraintSource, ValueSource};
use crate::validator::{ValidationFailure, Validator};

/// A compiled constraint for one key
#[derive(Debug, Clone)]
pub struct CompiledConstraint {
    /// Expression as written in the source
    pub expr: String,
    /// Parsed validator, or why the expression could not be parsed
    pub validator: Result<Validator, ConstraintError>,
}

/// Validators compiled once per declared key
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    constraints: BTreeMap<String, CompiledConstraint>,
}

impl ConstraintSet {
    /// Parse every declared expression. Malformed ones are kept so they show up in reports.
    pub fn compile(source: &ConstraintSource, options: ParseOptions) -> Self {
        let mut constraints = BTreeMap::new();
        for (key, expr) in source.iter() {
            let validator = parse_type_with(expr, options);
            if let Err(error) = &validator {
                warn!(key, expr, %error, "malformed constraint");
            }
            constraints.insert(
                key.to_string(),
                CompiledConstraint { expr: expr.to_string(), validator },
            );
        }
        Self { constraints }
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Validate every declared key against `values`
    pub fn check(&self, values: &ValueSource) -> Report {
        let entries: Vec<KeyReport> = self
            .constraints
            .iter()
            .map(|(key, constraint)| {
                let outcome = match &constraint.validator {
                    Err(error) => Outcome::Malformed { error: error.clone() },
                    Ok(validator) => match validator.validate(values.get(key)) {
                        Ok(value) => Outcome::Valid { value },
                        Err(reason) => Outcome::Invalid { reason },
                    },
                };
                debug!(
                    key = key.as_str(),
                    constraint = constraint.expr.as_str(),
                    ?outcome,
                    "checked key"
                );
                KeyReport {
                    key: key.clone(),
                    constraint: constraint.expr.clone(),
                    outcome,
                }
            })
            .collect();

        let report = Report { entries };
        info!(
            valid = report.valid_count(),
            invalid = report.invalid_count(),
            malformed = report.malformed_count(),
            "check complete"
        );
        report
    }

    /// Keys that have a value but no declared constraint
    pub fn undeclared_keys<'v>(&self, values: &'v ValueSource) -> Vec<&'v str> {
        values
            .keys()
            .filter(|key| !self.constraints.contains_key(*key))
            .collect()
    }
}

/// Result of checking one key
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Valid {
        value: Value,
    },
    Invalid {
        #[serde(serialize_with = "as_display")]
        reason: ValidationFailure,
    },
    Malformed {
        #[serde(serialize_with = "as_display")]
        error: ConstraintError,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyReport {
    pub key: String,
    pub constraint: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Outcome of a full check, in key order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    pub entries: Vec<KeyReport>,
}

impl Report {
    pub fn valid_count(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Valid { .. }))
    }

    pub fn invalid_count(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Invalid { .. }))
    }

    pub fn malformed_count(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Malformed { .. }))
    }

    /// No invalid values and no malformed constraints
    pub fn is_clean(&self) -> bool {
        self.invalid_count() == 0 && self.malformed_count() == 0
    }

    pub fn get(&self, key: &str) -> Option<&KeyReport> {
        self.entries.iter().find(|e| e.key == key)
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.outcome)).count()
    }
}

fn as_display<T: std::fmt::Display, S: Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}
