//! The single entry point: utterance in, plan out.
//!
//! Stages: `(N)` choice-prefix handling → parse (all trees) → one
//! interpretation attempt per parse → one planning attempt per
//! interpretation. Errors are suppressed as long as at least one parse
//! (and then one interpretation) survives; only when a whole stage fails
//! is the *first* error of that stage surfaced. If several
//! interpretations yield plans, the user is asked to choose and may
//! reissue the utterance with the `(N)` prefix.

use std::time::Duration;

use crate::formula::Dnf;
use crate::interpreter;
use crate::nl;
use crate::planner;
use crate::types::{EngineError, Result};
use crate::world::WorldState;

/// Run the full pipeline for one utterance.
pub fn process(input: &str, world: &WorldState, timeout: Duration) -> Result<Vec<String>> {
    let (choice, text) = split_choice_prefix(input);
    let commands = nl::parse_utterance(text)?;

    // interpretations, suppressing per-parse failures
    let mut interpretations: Vec<Dnf> = Vec::new();
    let mut first_error: Option<EngineError> = None;
    for command in &commands {
        match interpreter::interpret(command, world) {
            Ok(dnf) => {
                if !interpretations.contains(&dnf) {
                    interpretations.push(dnf);
                }
            }
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }
    if interpretations.is_empty() {
        return Err(first_error.unwrap_or(EngineError::NoInterpretation));
    }

    // plans, suppressing per-interpretation failures
    let mut plans: Vec<(String, Vec<String>)> = Vec::new();
    let mut first_plan_error: Option<EngineError> = None;
    for dnf in &interpretations {
        match planner::plan(dnf, world, timeout) {
            Ok(steps) => plans.push((dnf.to_string(), steps)),
            Err(e) => {
                first_plan_error.get_or_insert(e);
            }
        }
    }
    if plans.is_empty() {
        return Err(first_plan_error.unwrap_or(EngineError::NoInterpretation));
    }

    if let Some(n) = choice {
        return plans
            .into_iter()
            .nth(n)
            .map(|(_, steps)| steps)
            .ok_or_else(|| EngineError::Parse(format!("there is no interpretation ({})", n)));
    }

    if plans.len() > 1 {
        return Err(EngineError::ParseChoice {
            descriptions: plans.into_iter().map(|(goal, _)| goal).collect(),
        });
    }

    let (_, steps) = plans.into_iter().next().expect("exactly one plan");
    Ok(steps)
}

/// Split a leading `(N)` interpretation choice off the utterance.
fn split_choice_prefix(input: &str) -> (Option<usize>, &str) {
    let trimmed = input.trim_start();
    if let Some(rest) = trimmed.strip_prefix('(') {
        if let Some(close) = rest.find(')') {
            let digits = &rest[..close];
            if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                if let Ok(n) = digits.parse() {
                    return (Some(n), &rest[close + 1..]);
                }
            }
        }
    }
    (None, input)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
