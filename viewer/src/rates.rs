use glt_discovery::TestTypeMetrics;
use serde::Serialize;

/// Per second rates of one test type, in chart series order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Rates {
    /// requests that were neither updates nor writes
    pub reads: i64,
    pub updates: i64,
    pub writes: i64,
    pub retries: i64,
}

impl Rates {
    /// Rounds half up (towards positive infinity), also for negative reads: -2.5 -> -2.
    /// Rates beyond the range of `i64` saturate.
    pub fn from_metrics(metrics: &TestTypeMetrics) -> Self {
        let per_second = |value: f64| (value / metrics.duration + 0.5).floor() as i64;
        let reads = metrics.requests - metrics.updates - metrics.writes;

        Self {
            reads: per_second(reads),
            updates: per_second(metrics.updates),
            writes: per_second(metrics.writes),
            retries: per_second(metrics.retries),
        }
    }

    pub fn series(&self) -> [i64; 4] {
        [self.reads, self.updates, self.writes, self.retries]
    }

    /// height of the stacked bar, negative series do not contribute
    pub fn stacked(&self) -> i64 {
        self.series()
            .iter()
            .fold(0i64, |total, value| total.saturating_add((*value).max(0)))
    }
}
