use std::collections::HashMap;

use crate::model::{Assignment, Diagnostic, Gradebook, ScoreState};

/// Per-(student, assignment) percentages on the common 0-100 scale.
/// Assignments with `max_points <= 0` are dropped here with a diagnostic;
/// absent submissions have no entry at all.
#[derive(Debug, Clone)]
pub struct NormalizedScores {
    pub students: Vec<String>,
    /// Retained assignments, in gradebook (first-seen input) order.
    pub assignments: Vec<Assignment>,
    entries: HashMap<(usize, usize), f64>,
    pub diagnostics: Vec<Diagnostic>,
}

impl NormalizedScores {
    pub fn get(&self, student: usize, assignment: usize) -> Option<f64> {
        self.entries.get(&(student, assignment)).copied()
    }

    /// One student's percentages across retained assignments, in assignment
    /// order. Skipped assignments contribute nothing.
    pub fn student_percentages(&self, student: usize) -> Vec<f64> {
        (0..self.assignments.len())
            .filter_map(|ai| self.get(student, ai))
            .collect()
    }

    /// Submitters' percentages for one assignment, in roster order.
    pub fn assignment_percentages(&self, assignment: usize) -> Vec<f64> {
        (0..self.students.len())
            .filter_map(|si| self.get(si, assignment))
            .collect()
    }
}

pub fn normalize(book: &Gradebook) -> NormalizedScores {
    let mut assignments: Vec<Assignment> = Vec::new();
    let mut retained: HashMap<usize, usize> = HashMap::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();

    for (ai, a) in book.assignments.iter().enumerate() {
        if a.max_points <= 0.0 {
            diagnostics.push(Diagnostic::assignment_excluded(&a.id, a.max_points));
            continue;
        }
        retained.insert(ai, assignments.len());
        assignments.push(a.clone());
    }

    let mut entries: HashMap<(usize, usize), f64> = HashMap::new();
    for si in 0..book.students.len() {
        for (&book_ai, &ri) in &retained {
            if let ScoreState::Scored(raw) = book.score(si, book_ai) {
                let pct = (100.0 * raw / assignments[ri].max_points).clamp(0.0, 100.0);
                entries.insert((si, ri), pct);
            }
        }
    }

    NormalizedScores {
        students: book.students.clone(),
        assignments,
        entries,
        diagnostics,
    }
}
