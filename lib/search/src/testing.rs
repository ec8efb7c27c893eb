// Shared fixtures for strategy tests
use rand::prelude::*;
use serde_json::json;
use viewx_core::{
    AggregateFunction, AggregateQuery, AggregateRow, AggregationDataSource, Catalog, Cohort,
    Error, FilterCondition, PayloadFilter, Result, RowRange, View,
};
use viewx_storage::Dataset;

/// Deterministic census-like table; married rows form the target cohort
pub fn census(rows: usize) -> Dataset {
    let catalog = Catalog::new(
        ["sex", "race", "workclass"],
        ["age", "hours_per_week", "capital_gain"],
    )
    .unwrap();

    let mut rng = StdRng::seed_from_u64(0x2545_F491);
    let values = (0..rows)
        .map(|_| {
            let married = rng.random_bool(0.5);
            let sex = if rng.random_ratio(1, 3) { "Female" } else { "Male" };
            let race = ["White", "Black", "Asian", "Other"][rng.random_range(0..4)];
            let workclass = ["Private", "Self-emp", "Gov"][rng.random_range(0..3)];
            let age = rng.random_range(20..60) + if married { 10 } else { 0 };
            let hours = rng.random_range(30..50) + if married && sex == "Male" { 15 } else { 0 };
            let gain = if married && race == "Asian" {
                rng.random_range(5000..6000)
            } else {
                rng.random_range(0..500)
            };
            json!({
                "sex": sex,
                "race": race,
                "workclass": workclass,
                "age": age,
                "hours_per_week": hours,
                "capital_gain": gain,
                "marital_status": if married { "Married" } else { "Single" },
            })
        })
        .collect();

    let married = PayloadFilter::new(FilterCondition::any_of("marital_status", ["Married"]));
    Dataset::from_values(catalog, values, &married)
}

pub fn all_views(dataset: &Dataset) -> Vec<View> {
    dataset.catalog().views(&AggregateFunction::ALL)
}

/// Source whose per-view divergence is fixed by the measure name
///
/// Target rows are always `{a: 1, b: 1}`; reference rows are `{a: 1, b: s}`
/// where `s` comes from `skews` (1.0, i.e. no divergence, when unknown).
/// Every query's cohort and range are recorded in issue order.
pub struct ScriptedSource {
    pub skews: Vec<(String, f64)>,
    pub max_id: Option<u64>,
    pub queries: Vec<(Cohort, Option<RowRange>)>,
    pub fail_after: Option<usize>,
}

impl ScriptedSource {
    pub fn new(skews: &[(&str, f64)], max_id: Option<u64>) -> Self {
        Self {
            skews: skews.iter().map(|(m, s)| (m.to_string(), *s)).collect(),
            max_id,
            queries: Vec::new(),
            fail_after: None,
        }
    }

    pub fn ranges(&self) -> Vec<Option<RowRange>> {
        self.queries.iter().map(|(_, range)| *range).collect()
    }

    pub fn cohorts(&self) -> Vec<Cohort> {
        self.queries.iter().map(|(cohort, _)| *cohort).collect()
    }

    fn skew(&self, measure: &str) -> f64 {
        self.skews
            .iter()
            .find(|(m, _)| m == measure)
            .map(|(_, s)| *s)
            .unwrap_or(1.0)
    }
}

impl AggregationDataSource for ScriptedSource {
    fn query(&mut self, query: &AggregateQuery) -> Result<Vec<AggregateRow>> {
        if let Some(limit) = self.fail_after {
            if self.queries.len() >= limit {
                return Err(Error::DataSource("server closed the connection".to_string()));
            }
        }
        self.queries.push((query.cohort(), query.range()));
        let (a, b): (Vec<f64>, Vec<f64>) = query
            .aggregates()
            .iter()
            .map(|agg| match query.cohort() {
                Cohort::Target => (1.0, 1.0),
                Cohort::Reference => (1.0, self.skew(&agg.measure)),
            })
            .unzip();
        Ok(vec![AggregateRow::new("a", a), AggregateRow::new("b", b)])
    }

    fn max_row_id(&mut self) -> Result<Option<u64>> {
        Ok(self.max_id)
    }
}

pub fn scripted_views(measures: &[&str]) -> Vec<View> {
    measures
        .iter()
        .map(|m| View::new("dim", AggregateFunction::Sum, *m))
        .collect()
}
