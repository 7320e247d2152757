use crate::results::ranking::ResultSet;

/// Summary block shown above the rankings. Derived on every read, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateMetrics {
    pub top_score: f64,
    pub mean_score: f64,
    pub count: usize,
    pub mean_ats_score: f64,
}

impl AggregateMetrics {
    /// `mean_score` rounded to one decimal for display.
    pub fn mean_score_display(&self) -> f64 {
        round_one_decimal(self.mean_score)
    }

    pub fn mean_ats_display(&self) -> f64 {
        round_one_decimal(self.mean_ats_score)
    }
}

/// `None` when there is nothing to summarise. Callers show no metrics block at all.
pub fn compute_metrics(results: Option<&ResultSet>) -> Option<AggregateMetrics> {
    let results = results.filter(|r| !r.is_empty())?;
    let count = results.len();

    let top_score = results
        .iter()
        .map(|c| c.final_score)
        .fold(f64::NEG_INFINITY, f64::max);
    let mean_score = results.iter().map(|c| c.final_score).sum::<f64>() / count as f64;
    let mean_ats_score = results.iter().map(|c| c.ats_score).sum::<f64>() / count as f64;

    Some(AggregateMetrics {
        top_score,
        mean_score,
        count,
        mean_ats_score,
    })
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
