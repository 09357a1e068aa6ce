use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::error::ValidationError;

/// Submission state for one (student, assignment) cell. A row without
/// `rawPoints` is an explicit no-submission; a submitted 0 is `Scored(0.0)`.
/// The two are never folded together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreState {
    NoMark,
    Scored(f64),
}

/// One flat input record, shape-checked but not yet cross-validated.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub student_id: String,
    pub assignment_id: String,
    pub assignment_title: String,
    pub due_date: Option<NaiveDate>,
    pub raw_points: Option<f64>,
    pub max_points: f64,
}

fn required_str(raw: &Value, row_index: usize, field: &str) -> Result<String, ValidationError> {
    match raw.get(field) {
        None | Some(Value::Null) => Err(ValidationError::new(
            row_index,
            field,
            "missing required field",
        )),
        Some(Value::String(s)) => {
            let t = s.trim();
            if t.is_empty() {
                Err(ValidationError::new(row_index, field, "must not be empty"))
            } else {
                Ok(t.to_string())
            }
        }
        Some(_) => Err(ValidationError::new(row_index, field, "must be a string")),
    }
}

/// Points arrive either as JSON numbers or as numeric strings (CSV upstreams
/// rarely type their columns). Null/absent means no value.
fn optional_points(raw: &Value, row_index: usize, field: &str) -> Result<Option<f64>, ValidationError> {
    let parsed = match raw.get(field) {
        None | Some(Value::Null) => return Ok(None),
        Some(v) if v.is_number() => v.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };
    match parsed {
        Some(n) if n.is_finite() => Ok(Some(n)),
        _ => Err(ValidationError::new(row_index, field, "must be numeric")),
    }
}

impl RawRow {
    pub fn from_value(row_index: usize, raw: &Value) -> Result<Self, ValidationError> {
        if !raw.is_object() {
            return Err(ValidationError::new(row_index, "row", "row must be an object"));
        }
        let student_id = required_str(raw, row_index, "studentId")?;
        let assignment_id = required_str(raw, row_index, "assignmentId")?;
        let assignment_title = required_str(raw, row_index, "assignmentTitle")?;
        let due_date = match raw.get("dueDate") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(
                NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
                    ValidationError::new(
                        row_index,
                        "dueDate",
                        format!("{s:?} is not a YYYY-MM-DD date"),
                    )
                })?,
            ),
            Some(_) => {
                return Err(ValidationError::new(
                    row_index,
                    "dueDate",
                    "must be a date string or null",
                ))
            }
        };
        let raw_points = optional_points(raw, row_index, "rawPoints")?;
        let Some(max_points) = optional_points(raw, row_index, "maxPoints")? else {
            return Err(ValidationError::new(
                row_index,
                "maxPoints",
                "missing required field",
            ));
        };
        Ok(Self {
            student_id,
            assignment_id,
            assignment_title,
            due_date,
            raw_points,
            max_points,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub id: String,
    pub title: String,
    pub due_date: Option<NaiveDate>,
    pub max_points: f64,
}

/// Non-fatal note collected while building or normalizing a gradebook.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignment_id: Option<String>,
}

impl Diagnostic {
    pub fn duplicate_row(row_index: usize, student_id: &str, assignment_id: &str) -> Self {
        Self {
            code: "duplicate_row".to_string(),
            message: format!(
                "duplicate row for student {student_id} / assignment {assignment_id}; later value wins"
            ),
            row_index: Some(row_index),
            assignment_id: Some(assignment_id.to_string()),
        }
    }

    pub fn assignment_excluded(assignment_id: &str, max_points: f64) -> Self {
        Self {
            code: "assignment_excluded".to_string(),
            message: format!(
                "assignment {assignment_id} has max points {max_points} and is excluded from normalization"
            ),
            row_index: None,
            assignment_id: Some(assignment_id.to_string()),
        }
    }
}

/// Normalized in-memory gradebook for one course offering. Built once per
/// aggregation request, immutable afterwards. Students and assignments keep
/// first-seen input order so repeated runs produce identical output.
#[derive(Debug, Clone)]
pub struct Gradebook {
    pub students: Vec<String>,
    pub assignments: Vec<Assignment>,
    scores: HashMap<(usize, usize), ScoreState>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Gradebook {
    pub fn build(rows: &[RawRow]) -> Result<Gradebook, ValidationError> {
        let mut students: Vec<String> = Vec::new();
        let mut student_idx: HashMap<String, usize> = HashMap::new();
        let mut assignments: Vec<Assignment> = Vec::new();
        let mut assignment_idx: HashMap<String, usize> = HashMap::new();
        let mut scores: HashMap<(usize, usize), ScoreState> = HashMap::new();
        let mut diagnostics: Vec<Diagnostic> = Vec::new();

        for (i, row) in rows.iter().enumerate() {
            if row.max_points < 0.0 {
                return Err(ValidationError::new(
                    i,
                    "maxPoints",
                    format!("max points must not be negative (got {})", row.max_points),
                ));
            }

            let si = match student_idx.get(&row.student_id) {
                Some(&v) => v,
                None => {
                    students.push(row.student_id.clone());
                    student_idx.insert(row.student_id.clone(), students.len() - 1);
                    students.len() - 1
                }
            };

            let ai = match assignment_idx.get(&row.assignment_id) {
                Some(&v) => {
                    // Later rows restate assignment metadata; last value wins,
                    // matching the duplicate-score policy.
                    let a = &mut assignments[v];
                    a.title = row.assignment_title.clone();
                    a.due_date = row.due_date;
                    a.max_points = row.max_points;
                    v
                }
                None => {
                    assignments.push(Assignment {
                        id: row.assignment_id.clone(),
                        title: row.assignment_title.clone(),
                        due_date: row.due_date,
                        max_points: row.max_points,
                    });
                    assignment_idx.insert(row.assignment_id.clone(), assignments.len() - 1);
                    assignments.len() - 1
                }
            };

            let state = match row.raw_points {
                Some(v) => ScoreState::Scored(v),
                None => ScoreState::NoMark,
            };
            if scores.insert((si, ai), state).is_some() {
                diagnostics.push(Diagnostic::duplicate_row(
                    i,
                    &row.student_id,
                    &row.assignment_id,
                ));
            }
        }

        Ok(Gradebook {
            students,
            assignments,
            scores,
            diagnostics,
        })
    }

    pub fn score(&self, student: usize, assignment: usize) -> ScoreState {
        self.scores
            .get(&(student, assignment))
            .copied()
            .unwrap_or(ScoreState::NoMark)
    }
}
