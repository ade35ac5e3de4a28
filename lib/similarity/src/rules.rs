//! Weighted field rules for comparing record payloads

use crate::distance::{
    boolean_similarity, categorical_similarity, number_similarity, text_similarity, Comparison,
};
use crate::MatcherError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of value stored in a payload field
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number,
    Categorical,
    Boolean,
}

/// How one payload field contributes to the pair score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldRule {
    pub field: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub comparison: Comparison,
    #[serde(default = "default_weight")]
    pub weight: f32,
}

fn default_weight() -> f32 {
    1.0
}

impl FieldRule {
    pub fn text(field: &str, weight: f32) -> Self {
        Self::new(field, FieldKind::Text, Comparison::Fuzzy, weight)
    }

    pub fn number(field: &str, comparison: Comparison, weight: f32) -> Self {
        Self::new(field, FieldKind::Number, comparison, weight)
    }

    pub fn categorical(field: &str, weight: f32) -> Self {
        Self::new(field, FieldKind::Categorical, Comparison::Exact, weight)
    }

    pub fn boolean(field: &str, weight: f32) -> Self {
        Self::new(field, FieldKind::Boolean, Comparison::Exact, weight)
    }

    pub fn new(field: &str, kind: FieldKind, comparison: Comparison, weight: f32) -> Self {
        Self {
            field: field.to_string(),
            kind,
            comparison,
            weight,
        }
    }

    /// Similarity of this field across two payloads; 0.0 if either lacks it
    pub fn similarity(&self, a: &Value, b: &Value) -> f32 {
        let (Some(x), Some(y)) = (a.get(&self.field), b.get(&self.field)) else {
            return 0.0;
        };
        match self.kind {
            FieldKind::Text => text_similarity(
                x.as_str().unwrap_or(""),
                y.as_str().unwrap_or(""),
                self.comparison,
            ),
            FieldKind::Number => match (x.as_f64(), y.as_f64()) {
                (Some(x), Some(y)) => number_similarity(x, y, self.comparison),
                _ => 0.0,
            },
            FieldKind::Categorical => categorical_similarity(
                x.as_str().unwrap_or(""),
                y.as_str().unwrap_or(""),
                self.comparison,
            ),
            FieldKind::Boolean => match (x.as_bool(), y.as_bool()) {
                (Some(x), Some(y)) => boolean_similarity(x, y),
                _ => 0.0,
            },
        }
    }
}

/// A validated rule set whose weights sum to 1.0
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldRules {
    rules: Vec<FieldRule>,
}

impl FieldRules {
    /// Validate the rules and normalize weights to sum to 1.0
    pub fn new(mut rules: Vec<FieldRule>) -> Result<Self, MatcherError> {
        if rules.is_empty() {
            return Err(MatcherError::NoRules);
        }
        if let Some(rule) = rules.iter().find(|r| r.weight < 0.0 || r.weight.is_nan()) {
            return Err(MatcherError::NegativeWeight(rule.field.clone()));
        }

        let total: f32 = rules.iter().map(|r| r.weight).sum();
        if total <= 0.0 {
            return Err(MatcherError::ZeroTotalWeight);
        }
        for rule in &mut rules {
            rule.weight /= total;
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Weighted similarity of two payloads in [0.0, 1.0]
    pub fn score(&self, a: Option<&Value>, b: Option<&Value>) -> f32 {
        let (Some(a), Some(b)) = (a, b) else {
            return 0.0;
        };
        self.rules
            .iter()
            .map(|rule| rule.weight * rule.similarity(a, b))
            .sum::<f32>()
            .min(1.0)
    }
}

impl<'de> Deserialize<'de> for FieldRules {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let rules = Vec::<FieldRule>::deserialize(deserializer)?;
        FieldRules::new(rules).map_err(serde::de::Error::custom)
    }
}
