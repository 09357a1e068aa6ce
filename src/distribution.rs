use serde::Serialize;

use crate::error::EngineError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionBucket {
    #[serde(rename = "bucketLabel")]
    pub bucket_label: String,
    pub count: usize,
}

/// Labels for the half-open `[k*w, (k+1)*w)` buckets spanning [0, 100),
/// plus the terminal closed `[100, 100]` bucket for perfect scores.
pub fn bucket_labels(width: u32) -> Vec<String> {
    let mut labels = Vec::new();
    let mut lo = 0u32;
    while lo < 100 {
        let hi = (lo + width).min(100);
        labels.push(format!("{}-{}", lo, hi - 1));
        lo = hi;
    }
    labels.push("100".to_string());
    labels
}

/// Buckets per-student final percentages. Every bucket is emitted, empties
/// included, in ascending order. Inputs outside [0, 100] violate the
/// normalizer's clamping invariant and fail the request rather than being
/// clamped a second time.
pub fn bin(finals: &[f64], width: u32) -> Result<Vec<DistributionBucket>, EngineError> {
    let labels = bucket_labels(width);
    let mut counts = vec![0usize; labels.len()];

    for &pct in finals {
        if !(0.0..=100.0).contains(&pct) {
            tracing::error!(pct, width, "final percentage outside [0, 100] reached the binner");
            return Err(EngineError::Invariant {
                context: format!("final percentage {pct} outside [0, 100]"),
            });
        }
        let idx = if pct >= 100.0 {
            counts.len() - 1
        } else {
            (pct / f64::from(width)).floor() as usize
        };
        counts[idx] += 1;
    }

    Ok(labels
        .into_iter()
        .zip(counts)
        .map(|(bucket_label, count)| DistributionBucket { bucket_label, count })
        .collect())
}
