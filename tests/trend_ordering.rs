use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_gradebookd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn gradebookd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({ "id": id, "method": method, "params": params });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");
    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

fn row(
    student: &str,
    assignment: &str,
    due: Option<&str>,
    raw: serde_json::Value,
    max: f64,
) -> serde_json::Value {
    json!({
        "studentId": student,
        "assignmentId": assignment,
        "assignmentTitle": assignment,
        "dueDate": due,
        "rawPoints": raw,
        "maxPoints": max
    })
}

#[test]
fn trend_points_sorted_by_due_date_with_undated_appended() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let rows = json!([
        row("s1", "project", None, json!(70), 100.0),
        row("s1", "quiz2", Some("2025-10-01"), json!(60), 100.0),
        row("s1", "quiz1", Some("2025-09-01"), json!(90), 100.0),
    ]);
    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "course.trends",
        json!({ "rows": rows }),
    );

    let trends = result["trends"].as_array().expect("trends");
    let titles: Vec<&str> = trends
        .iter()
        .map(|t| t["title"].as_str().expect("title"))
        .collect();
    assert_eq!(titles, vec!["quiz1", "quiz2", "project"]);
    assert_eq!(trends[0]["dueDate"].as_str(), Some("2025-09-01"));
    assert_eq!(trends[1]["dueDate"].as_str(), Some("2025-10-01"));
    assert!(trends[2]["dueDate"].is_null());

    let _ = child.kill();
}

#[test]
fn assignment_average_covers_submitters_only() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    // Quiz due to half the roster: average over the two submitters.
    let rows = json!([
        row("s1", "quiz", Some("2025-09-01"), json!(40), 50.0),
        row("s2", "quiz", Some("2025-09-01"), serde_json::Value::Null, 50.0),
        row("s3", "quiz", Some("2025-09-01"), json!(50), 50.0),
    ]);
    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "course.trends",
        json!({ "rows": rows }),
    );
    let trends = result["trends"].as_array().expect("trends");
    assert_eq!(trends.len(), 1);
    assert!((trends[0]["avg_pct"].as_f64().expect("avg_pct") - 90.0).abs() < 1e-9);

    let _ = child.kill();
}

#[test]
fn zero_submission_assignment_keeps_its_slot_with_null_average() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let rows = json!([
        row("s1", "skipped", Some("2025-09-01"), serde_json::Value::Null, 100.0),
        row("s1", "done", Some("2025-09-08"), json!(75), 100.0),
    ]);
    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "course.trends",
        json!({ "rows": rows }),
    );
    let trends = result["trends"].as_array().expect("trends");
    assert_eq!(trends.len(), 2);
    assert_eq!(trends[0]["title"].as_str(), Some("skipped"));
    assert!(trends[0]["avg_pct"].is_null());
    assert!((trends[1]["avg_pct"].as_f64().expect("avg_pct") - 75.0).abs() < 1e-9);

    let _ = child.kill();
}

#[test]
fn excluded_assignment_does_not_appear_in_trends() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let rows = json!([
        row("s1", "ungraded", Some("2025-09-01"), json!(3), 0.0),
        row("s1", "real", Some("2025-09-08"), json!(80), 100.0),
    ]);
    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "course.trends",
        json!({ "rows": rows }),
    );
    let trends = result["trends"].as_array().expect("trends");
    assert_eq!(trends.len(), 1);
    assert_eq!(trends[0]["title"].as_str(), Some("real"));

    let _ = child.kill();
}
