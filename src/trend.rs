use serde::Serialize;
use std::cmp::Ordering;

use crate::calc::round_off_2_decimals;
use crate::normalize::NormalizedScores;

/// One point of the per-assignment trend series. `due_date` is `None` for
/// undated assignments (appended after the dated ones); `avg_pct` is `None`
/// when nobody submitted, so charts keep a continuous x-axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub title: String,
    #[serde(rename = "dueDate")]
    pub due_date: Option<String>,
    pub avg_pct: Option<f64>,
}

/// Per-assignment averages over submitters only, ordered by due date
/// ascending. The sort is stable, so ties and undated assignments keep their
/// input order.
pub fn trend(scores: &NormalizedScores) -> Vec<TrendPoint> {
    let mut points: Vec<(Option<chrono::NaiveDate>, TrendPoint)> = Vec::new();
    for (ai, a) in scores.assignments.iter().enumerate() {
        let pcts = scores.assignment_percentages(ai);
        let avg_pct = if pcts.is_empty() {
            None
        } else {
            Some(round_off_2_decimals(
                pcts.iter().sum::<f64>() / pcts.len() as f64,
            ))
        };
        points.push((
            a.due_date,
            TrendPoint {
                title: a.title.clone(),
                due_date: a.due_date.map(|d| d.to_string()),
                avg_pct,
            },
        ));
    }

    points.sort_by(|a, b| match (a.0, b.0) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    points.into_iter().map(|(_, p)| p).collect()
}
