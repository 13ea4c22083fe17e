//! Disambiguation of `the` quantifiers.
//!
//! After the goal formula is built, every `the`-quantified top-level
//! position must bind a single identifier. The command entity appears in
//! argument column 0 of each conjunction's first literal, the location
//! entity in column 1, and the second `between` entity in column 2. If a
//! column binds several distinct identifiers, the user is asked to choose
//! between their full descriptions; if two distinct identifiers share the
//! same full description, no question can tell them apart and the
//! description itself is reported as ambiguous.
//!
//! Counting distinct identifiers (rather than conjunctions) makes the
//! swapped `between` orderings harmless: both orders bind the same
//! identifier set, so an unambiguous pair never triggers a question.

use crate::formula::Dnf;
use crate::physics;
use crate::types::{Command, EngineError, Entity, Location, Quantifier, Result};
use crate::world::WorldState;

/// Check every `the` position of the command against the built formula.
pub fn check(command: &Command, dnf: &Dnf, world: &WorldState) -> Result<()> {
    match command {
        Command::Take(entity) => check_column(entity, dnf, 0, world),
        Command::Move(entity, location) => {
            check_column(entity, dnf, 0, world)?;
            check_location(location, dnf, world)
        }
        Command::Put(location) => check_location(location, dnf, world),
    }
}

fn check_location(location: &Location, dnf: &Dnf, world: &WorldState) -> Result<()> {
    check_column(&location.entity, dnf, 1, world)?;
    if let Some(entity2) = &location.entity2 {
        check_column(entity2, dnf, 2, world)?;
    }
    Ok(())
}

fn check_column(entity: &Entity, dnf: &Dnf, column: usize, world: &WorldState) -> Result<()> {
    if entity.quantifier != Quantifier::The {
        return Ok(());
    }

    let mut ids: Vec<&str> = Vec::new();
    for conjunction in &dnf.conjunctions {
        if let Some(literal) = conjunction.first() {
            if let Some(id) = literal.args.get(column) {
                if !ids.contains(&id.as_str()) {
                    ids.push(id);
                }
            }
        }
    }
    if ids.len() < 2 {
        return Ok(());
    }

    let mut descriptions: Vec<String> = Vec::new();
    for id in &ids {
        let def = world
            .def(id)
            .ok_or_else(|| EngineError::Internal(format!("no definition for '{}'", id)))?;
        let description = format!("the {}", physics::full_description(&def));
        if descriptions.contains(&description) {
            return Err(EngineError::DescriptionAmbiguous(physics::full_description(&def)));
        }
        descriptions.push(description);
    }
    Err(EngineError::Clarify { descriptions })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
