use crate::aggregate::Accumulator;
use crate::loader;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};
use viewx_core::{
    AggregateQuery, AggregateRow, AggregationDataSource, Catalog, Cohort, Error, Filter, Record,
    Result,
};

/// An in-memory table split into target and reference cohorts
///
/// Cohort membership is decided once, at construction, by a [`Filter`]: rows
/// matching it form the target cohort, every other row the reference cohort.
pub struct Dataset {
    catalog: Catalog,
    records: Vec<Record>,
    cohorts: Vec<Cohort>,
    max_id: Option<u64>,
}

impl Dataset {
    pub fn new<F: Filter + ?Sized>(catalog: Catalog, records: Vec<Record>, filter: &F) -> Self {
        let cohorts: Vec<Cohort> = records.iter().map(|r| filter.cohort_of(r)).collect();
        let max_id = records.iter().map(|r| r.id).max();
        let dataset = Self {
            catalog,
            records,
            cohorts,
            max_id,
        };
        debug!(
            rows = dataset.len(),
            target = dataset.cohort_size(Cohort::Target),
            reference = dataset.cohort_size(Cohort::Reference),
            "dataset materialized"
        );
        dataset
    }

    /// Build from JSON objects, assigning row ids by position
    pub fn from_values<F: Filter + ?Sized>(
        catalog: Catalog,
        values: Vec<serde_json::Value>,
        filter: &F,
    ) -> Self {
        let records = values
            .into_iter()
            .enumerate()
            .map(|(id, payload)| Record::new(id as u64, payload))
            .collect();
        Self::new(catalog, records, filter)
    }

    /// Load a JSON-lines file, one object per line
    ///
    /// Blank lines are skipped; row ids are positions among the remaining rows.
    pub fn load_jsonl<P: AsRef<Path>, F: Filter + ?Sized>(
        path: P,
        catalog: Catalog,
        filter: &F,
    ) -> Result<Self> {
        let path = path.as_ref();
        let values = loader::read_jsonl(path)?;
        info!("Loaded {} rows from {:?}", values.len(), path);
        Ok(Self::from_values(catalog, values, filter))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn cohort_size(&self, cohort: Cohort) -> usize {
        self.cohorts.iter().filter(|c| **c == cohort).count()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    fn validate(&self, query: &AggregateQuery) -> Result<()> {
        if !self.catalog.contains_dimension(query.dimension()) {
            return Err(Error::UnknownColumn(query.dimension().to_string()));
        }
        for aggregate in query.aggregates() {
            if !self.catalog.contains_measure(&aggregate.measure) {
                return Err(Error::UnknownColumn(aggregate.measure.clone()));
            }
        }
        Ok(())
    }
}

impl AggregationDataSource for Dataset {
    /// Grouped aggregation in a single scan: every requested aggregate is
    /// accumulated side by side for each group.
    fn query(&mut self, query: &AggregateQuery) -> Result<Vec<AggregateRow>> {
        self.validate(query)?;

        let aggregates = query.aggregates();
        let range = query.range();
        let mut groups: BTreeMap<String, Vec<Accumulator>> = BTreeMap::new();

        for (record, cohort) in self.records.iter().zip(&self.cohorts) {
            if *cohort != query.cohort() {
                continue;
            }
            if let Some(range) = range {
                if !range.contains(record.id) {
                    continue;
                }
            }
            let Some(category) = record.category(query.dimension()) else {
                continue;
            };
            let accumulators = groups
                .entry(category)
                .or_insert_with(|| vec![Accumulator::default(); aggregates.len()]);
            for (acc, aggregate) in accumulators.iter_mut().zip(aggregates) {
                if let Some(value) = record.number(&aggregate.measure) {
                    acc.push(value);
                }
            }
        }

        Ok(groups
            .into_iter()
            .map(|(category, accumulators)| {
                let values = accumulators
                    .iter()
                    .zip(aggregates)
                    .map(|(acc, aggregate)| acc.finish(aggregate.function))
                    .collect();
                AggregateRow::new(category, values)
            })
            .collect())
    }

    fn max_row_id(&mut self) -> Result<Option<u64>> {
        Ok(self.max_id)
    }
}
