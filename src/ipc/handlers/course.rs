use crate::aggregate::{aggregate, AggregateResult};
use crate::config::{validate_bucket_width, validate_pass_threshold, EngineConfig};
use crate::error::EngineError;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::model::RawRow;
use serde_json::json;

fn parse_rows(req: &Request) -> Result<Vec<RawRow>, serde_json::Value> {
    let Some(raw) = req.params.get("rows").and_then(|v| v.as_array()) else {
        return Err(err(&req.id, "bad_params", "missing params.rows", None));
    };
    let mut rows = Vec::with_capacity(raw.len());
    for (i, v) in raw.iter().enumerate() {
        match RawRow::from_value(i, v) {
            Ok(r) => rows.push(r),
            Err(e) => {
                return Err(err(
                    &req.id,
                    "validation_failed",
                    e.to_string(),
                    Some(json!(e)),
                ))
            }
        }
    }
    Ok(rows)
}

/// Per-request config: process defaults plus optional `passThreshold` /
/// `bucketWidth` overrides in params.
fn request_config(state: &AppState, req: &Request) -> Result<EngineConfig, serde_json::Value> {
    let mut cfg = state.config;
    match req.params.get("passThreshold") {
        None => {}
        Some(v) if v.is_null() => {}
        Some(v) => {
            let Some(n) = v.as_f64() else {
                return Err(err(&req.id, "bad_params", "passThreshold must be a number", None));
            };
            cfg.pass_threshold =
                validate_pass_threshold(n).map_err(|m| err(&req.id, "bad_params", m, None))?;
        }
    }
    match req.params.get("bucketWidth") {
        None => {}
        Some(v) if v.is_null() => {}
        Some(v) => {
            let Some(n) = v.as_u64().and_then(|n| u32::try_from(n).ok()) else {
                return Err(err(
                    &req.id,
                    "bad_params",
                    "bucketWidth must be a positive integer",
                    None,
                ));
            };
            cfg.bucket_width =
                validate_bucket_width(n).map_err(|m| err(&req.id, "bad_params", m, None))?;
        }
    }
    Ok(cfg)
}

fn run_aggregate(state: &AppState, req: &Request) -> Result<AggregateResult, serde_json::Value> {
    let rows = parse_rows(req)?;
    let cfg = request_config(state, req)?;
    aggregate(&rows, &cfg).map_err(|e| match e {
        EngineError::Validation(v) => err(
            &req.id,
            "validation_failed",
            v.to_string(),
            Some(json!(v)),
        ),
        EngineError::Invariant { context } => err(&req.id, "invariant_violation", context, None),
    })
}

fn handle_aggregate(state: &AppState, req: &Request) -> serde_json::Value {
    match run_aggregate(state, req) {
        Ok(result) => ok(&req.id, json!(result)),
        Err(resp) => resp,
    }
}

fn handle_summary(state: &AppState, req: &Request) -> serde_json::Value {
    match run_aggregate(state, req) {
        Ok(result) => ok(&req.id, json!(result.summary)),
        Err(resp) => resp,
    }
}

fn handle_distribution(state: &AppState, req: &Request) -> serde_json::Value {
    match run_aggregate(state, req) {
        Ok(result) => ok(&req.id, json!(result.distribution)),
        Err(resp) => resp,
    }
}

fn handle_trends(state: &AppState, req: &Request) -> serde_json::Value {
    match run_aggregate(state, req) {
        Ok(result) => ok(&req.id, json!(result.trends)),
        Err(resp) => resp,
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "course.aggregate" => Some(handle_aggregate(state, req)),
        "course.summary" => Some(handle_summary(state, req)),
        "course.distribution" => Some(handle_distribution(state, req)),
        "course.trends" => Some(handle_trends(state, req)),
        _ => None,
    }
}
