// Record predicates used to split a dataset into target and reference cohorts
use crate::{Cohort, Record};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub trait Filter {
    fn matches(&self, record: &Record) -> bool;

    /// Rows matching the filter form the target cohort, the rest the reference
    fn cohort_of(&self, record: &Record) -> Cohort {
        if self.matches(record) {
            Cohort::Target
        } else {
            Cohort::Reference
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadFilter {
    condition: FilterCondition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterCondition {
    Equals { field: String, value: Value },
    NotEquals { field: String, value: Value },
    GreaterThan { field: String, value: f64 },
    LessThan { field: String, value: f64 },
    GreaterEqual { field: String, value: f64 },
    LessEqual { field: String, value: f64 },
    Contains { field: String, value: String },
    And(Vec<FilterCondition>),
    Or(Vec<FilterCondition>),
    Not(Box<FilterCondition>),
}

impl FilterCondition {
    /// `field` equals any of `values`
    pub fn any_of<I, V>(field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        FilterCondition::Or(
            values
                .into_iter()
                .map(|value| FilterCondition::Equals {
                    field: field.to_string(),
                    value: value.into(),
                })
                .collect(),
        )
    }
}

impl PayloadFilter {
    pub fn new(condition: FilterCondition) -> Self {
        Self { condition }
    }

    pub fn condition(&self) -> &FilterCondition {
        &self.condition
    }

    fn get_field_value<'a>(record: &'a Record, field: &str) -> Option<&'a Value> {
        record.get(field.strip_prefix('.').unwrap_or(field))
    }

    /// Numeric comparison; rows without a numeric value never match
    fn compare(record: &Record, field: &str, test: impl Fn(f64) -> bool) -> bool {
        record
            .number(field.strip_prefix('.').unwrap_or(field))
            .is_some_and(test)
    }

    fn matches_condition(condition: &FilterCondition, record: &Record) -> bool {
        match condition {
            FilterCondition::Equals { field, value } => {
                Self::get_field_value(record, field) == Some(value)
            }
            FilterCondition::NotEquals { field, value } => {
                Self::get_field_value(record, field) != Some(value)
            }
            FilterCondition::GreaterThan { field, value } => Self::compare(record, field, |v| v > *value),
            FilterCondition::LessThan { field, value } => Self::compare(record, field, |v| v < *value),
            FilterCondition::GreaterEqual { field, value } => Self::compare(record, field, |v| v >= *value),
            FilterCondition::LessEqual { field, value } => Self::compare(record, field, |v| v <= *value),
            FilterCondition::Contains { field, value } => {
                Self::get_field_value(record, field)
                    .and_then(|v| v.as_str())
                    .is_some_and(|v| v.contains(value.as_str()))
            }
            FilterCondition::And(conditions) => {
                conditions.iter().all(|c| Self::matches_condition(c, record))
            }
            FilterCondition::Or(conditions) => {
                conditions.iter().any(|c| Self::matches_condition(c, record))
            }
            FilterCondition::Not(condition) => {
                !Self::matches_condition(condition, record)
            }
        }
    }
}

impl Filter for PayloadFilter {
    fn matches(&self, record: &Record) -> bool {
        Self::matches_condition(&self.condition, record)
    }
}

impl<F: Fn(&Record) -> bool> Filter for F {
    fn matches(&self, record: &Record) -> bool {
        self(record)
    }
}
