use serde::Serialize;

use crate::calc::{student_final_percentages, summarize, CourseSummary};
use crate::config::EngineConfig;
use crate::distribution::{bin, DistributionBucket};
use crate::error::EngineError;
use crate::model::{Diagnostic, Gradebook, RawRow};
use crate::normalize::normalize;
use crate::trend::{trend, TrendPoint};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionModel {
    pub buckets: Vec<DistributionBucket>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendModel {
    pub trends: Vec<TrendPoint>,
}

/// The single immutable result bundle. Either the whole bundle is produced
/// or the request fails; no partial population.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    pub summary: CourseSummary,
    pub distribution: DistributionModel,
    pub trends: TrendModel,
    pub diagnostics: Vec<Diagnostic>,
}

/// Pure orchestration: build -> normalize -> {summary, distribution, trend}.
/// Each call is a function of its input rows and config; no module-level
/// state, no I/O.
pub fn aggregate(rows: &[RawRow], config: &EngineConfig) -> Result<AggregateResult, EngineError> {
    let book = Gradebook::build(rows)?;
    let scores = normalize(&book);

    let mut diagnostics = book.diagnostics.clone();
    diagnostics.extend(scores.diagnostics.iter().cloned());

    let finals = student_final_percentages(&scores);
    let summary = summarize(&finals, scores.assignments.len(), config.pass_threshold);
    let buckets = bin(&finals, config.bucket_width)?;
    let trends = trend(&scores);

    tracing::info!(
        rows = rows.len(),
        students = summary.students,
        assignments = summary.assignments,
        "aggregated course rows"
    );
    if !diagnostics.is_empty() {
        tracing::debug!(count = diagnostics.len(), "non-fatal diagnostics collected");
    }

    Ok(AggregateResult {
        summary,
        distribution: DistributionModel { buckets },
        trends: TrendModel { trends },
        diagnostics,
    })
}
