use crate::config::{validate_bucket_width, validate_pass_threshold};
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "passThreshold": state.config.pass_threshold,
            "bucketWidth": state.config.bucket_width,
        }),
    )
}

/// Adjusts the process-default pass threshold / bucket width. Individual
/// course requests may still override either value.
fn handle_configure(state: &mut AppState, req: &Request) -> serde_json::Value {
    match req.params.get("passThreshold") {
        None => {}
        Some(v) if v.is_null() => {}
        Some(v) => {
            let Some(n) = v.as_f64() else {
                return err(&req.id, "bad_params", "passThreshold must be a number", None);
            };
            match validate_pass_threshold(n) {
                Ok(t) => state.config.pass_threshold = t,
                Err(m) => return err(&req.id, "bad_params", m, None),
            }
        }
    }
    match req.params.get("bucketWidth") {
        None => {}
        Some(v) if v.is_null() => {}
        Some(v) => {
            let Some(n) = v.as_u64().and_then(|n| u32::try_from(n).ok()) else {
                return err(
                    &req.id,
                    "bad_params",
                    "bucketWidth must be a positive integer",
                    None,
                );
            };
            match validate_bucket_width(n) {
                Ok(w) => state.config.bucket_width = w,
                Err(m) => return err(&req.id, "bad_params", m, None),
            }
        }
    }

    ok(
        &req.id,
        json!({
            "passThreshold": state.config.pass_threshold,
            "bucketWidth": state.config.bucket_width,
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "engine.configure" => Some(handle_configure(state, req)),
        _ => None,
    }
}
