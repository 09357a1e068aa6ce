use anyhow::Context;

/// Process-wide defaults; every aggregation request may override them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Final percentage at or above which a student counts as passing.
    pub pass_threshold: f64,
    /// Width of the half-open distribution buckets, in percentage points.
    pub bucket_width: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pass_threshold: 60.0,
            bucket_width: 10,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let mut cfg = Self::default();
        if let Ok(raw) = std::env::var("GRADEBOOKD_PASS_THRESHOLD") {
            let v: f64 = raw
                .trim()
                .parse()
                .with_context(|| format!("GRADEBOOKD_PASS_THRESHOLD is not a number: {raw:?}"))?;
            cfg.pass_threshold = validate_pass_threshold(v).map_err(anyhow::Error::msg)?;
        }
        if let Ok(raw) = std::env::var("GRADEBOOKD_BUCKET_WIDTH") {
            let v: u32 = raw
                .trim()
                .parse()
                .with_context(|| format!("GRADEBOOKD_BUCKET_WIDTH is not an integer: {raw:?}"))?;
            cfg.bucket_width = validate_bucket_width(v).map_err(anyhow::Error::msg)?;
        }
        Ok(cfg)
    }
}

pub fn validate_pass_threshold(v: f64) -> Result<f64, String> {
    if v.is_finite() && (0.0..=100.0).contains(&v) {
        Ok(v)
    } else {
        Err(format!("pass threshold must be between 0 and 100, got {v}"))
    }
}

pub fn validate_bucket_width(v: u32) -> Result<u32, String> {
    if (1..=100).contains(&v) {
        Ok(v)
    } else {
        Err(format!("bucket width must be between 1 and 100, got {v}"))
    }
}
