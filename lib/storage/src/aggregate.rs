use viewx_core::AggregateFunction;

/// Running state for one `function(measure)` column within one group
#[derive(Debug, Clone, Copy, Default)]
pub struct Accumulator {
    count: u64,
    sum: f64,
    min: Option<f64>,
    max: Option<f64>,
}

impl Accumulator {
    #[inline]
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
    }

    /// Final value of the column. Groups without any non-null measure value
    /// report 0 for every function.
    pub fn finish(&self, function: AggregateFunction) -> f64 {
        match function {
            AggregateFunction::Count => self.count as f64,
            AggregateFunction::Sum => self.sum,
            AggregateFunction::Min => self.min.unwrap_or(0.0),
            AggregateFunction::Max => self.max.unwrap_or(0.0),
            AggregateFunction::Avg => {
                if self.count == 0 {
                    0.0
                } else {
                    self.sum / self.count as f64
                }
            }
        }
    }
}
