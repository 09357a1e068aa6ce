use serde::Serialize;
use std::cmp::Ordering;

use crate::normalize::NormalizedScores;

/// 2-decimal reporting rounding: `Int(100*x + 0.5) / 100`.
pub fn round_off_2_decimals(x: f64) -> f64 {
    ((100.0 * x) + 0.5).floor() / 100.0
}

/// Course-level descriptive statistics over per-student final percentages.
/// The four statistics are `None` when no student has a gradable submission;
/// that is a valid empty result, not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseSummary {
    pub students: usize,
    pub assignments: usize,
    pub avg_pct: Option<f64>,
    pub median_pct: Option<f64>,
    pub stddev_pct: Option<f64>,
    pub pass_rate_pct: Option<f64>,
}

pub fn compute_median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[(n / 2) - 1] + sorted[n / 2]) / 2.0
    }
}

/// Per-student final percentages: mean of each student's normalized scores
/// over the assignments they submitted. Students with zero gradable
/// submissions are excluded entirely rather than treated as 0%.
pub fn student_final_percentages(scores: &NormalizedScores) -> Vec<f64> {
    let mut finals = Vec::new();
    for si in 0..scores.students.len() {
        let pcts = scores.student_percentages(si);
        if pcts.is_empty() {
            continue;
        }
        finals.push(pcts.iter().sum::<f64>() / pcts.len() as f64);
    }
    finals
}

pub fn summarize(finals: &[f64], assignments: usize, pass_threshold: f64) -> CourseSummary {
    let students = finals.len();
    if students == 0 {
        return CourseSummary {
            students: 0,
            assignments,
            avg_pct: None,
            median_pct: None,
            stddev_pct: None,
            pass_rate_pct: None,
        };
    }

    let n = students as f64;
    let mean = finals.iter().sum::<f64>() / n;
    // Two-pass population variance (denominator N).
    let variance = finals.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    let passed = finals.iter().filter(|&&v| v >= pass_threshold).count();

    CourseSummary {
        students,
        assignments,
        avg_pct: Some(round_off_2_decimals(mean)),
        median_pct: Some(round_off_2_decimals(compute_median(finals))),
        stddev_pct: Some(round_off_2_decimals(variance.sqrt())),
        pass_rate_pct: Some(round_off_2_decimals(100.0 * passed as f64 / n)),
    }
}
