//! The planner: run A* over world nodes for a DNF goal, then walk the
//! state path and emit the interleaved narration + atomic action plan.
//!
//! The emitted sequence mixes single-character atoms (`p`, `d`, `l`, `r`)
//! with narration lines; executors consume only the atoms. The atom count
//! equals the true robot-action count of the plan.

use std::time::Duration;

use crate::formula::Dnf;
use crate::graph::WorldNode;
use crate::heuristic;
use crate::physics;
use crate::search::{self, SearchError};
use crate::types::{EngineError, Result};
use crate::world::WorldState;

/// Default wall-clock budget for one search.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Plan a sequence of actions that satisfies `dnf` from `world`.
///
/// If the goal already holds, the plan is the single narration
/// `"That is already true!"` and contains no atoms.
pub fn plan(dnf: &Dnf, world: &WorldState, timeout: Duration) -> Result<Vec<String>> {
    let objects = &world.objects;
    let start = WorldNode::from_world(world);

    if dnf.holds_in(&start, objects) {
        return Ok(vec!["That is already true!".to_string()]);
    }

    let result = search::a_star(
        start,
        |n| n.successors(objects),
        |n| dnf.holds_in(n, objects),
        |n| heuristic::estimate(dnf, n, objects),
        timeout,
    )
    .map_err(|e| match e {
        SearchError::Timeout => EngineError::Timeout,
        SearchError::Exhausted => {
            EngineError::Internal("no reachable state satisfies the goal".into())
        }
    })?;

    emit(&result.path, world)
}

// ---------------------------------------------------------------------------
// Plan emission
// ---------------------------------------------------------------------------

/// Walk consecutive state pairs and narrate the single pick or drop that
/// separates them, preceded by the arm motion to the changed column.
fn emit(path: &[WorldNode], world: &WorldState) -> Result<Vec<String>> {
    let mut out = Vec::new();
    let mut arm = world.arm;

    for pair in path.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if prev.holding.is_none() {
            let (stack, id) = picked_from(prev, next)?;
            move_arm(&mut out, &mut arm, stack);
            out.push(format!("Picking up the {}", physics::minimal_description(&id, world)?));
            out.push("p".to_string());
        } else {
            let (stack, id) = dropped_onto(prev, next)?;
            move_arm(&mut out, &mut arm, stack);
            out.push(format!("Dropping the {}", physics::minimal_description(&id, world)?));
            out.push("d".to_string());
        }
    }
    Ok(out)
}

/// The column a pick happened at, and what was picked.
fn picked_from(prev: &WorldNode, next: &WorldNode) -> Result<(usize, String)> {
    for (i, (before, after)) in prev.stacks.iter().zip(&next.stacks).enumerate() {
        if before.len() == after.len() + 1 {
            let id = before.last().cloned().ok_or_else(|| {
                EngineError::Internal("pick transition from an empty column".into())
            })?;
            return Ok((i, id));
        }
    }
    Err(EngineError::Internal("adjacent states differ by no pick".into()))
}

/// The column a drop happened at, and what was dropped.
fn dropped_onto(prev: &WorldNode, next: &WorldNode) -> Result<(usize, String)> {
    for (i, (before, after)) in prev.stacks.iter().zip(&next.stacks).enumerate() {
        if after.len() == before.len() + 1 {
            let id = after.last().cloned().ok_or_else(|| {
                EngineError::Internal("drop transition onto no column".into())
            })?;
            return Ok((i, id));
        }
    }
    Err(EngineError::Internal("adjacent states differ by no drop".into()))
}

/// Narrate and emit the arm motion from the current column to `target`.
fn move_arm(out: &mut Vec<String>, arm: &mut usize, target: usize) {
    if *arm > target {
        out.push("Moving left".to_string());
        for _ in target..*arm {
            out.push("l".to_string());
        }
    } else if *arm < target {
        out.push("Moving right".to_string());
        for _ in *arm..target {
            out.push("r".to_string());
        }
    }
    *arm = target;
}

/// Count the atomic actions in a plan.
pub fn atom_count(plan: &[String]) -> usize {
    plan.iter().filter(|s| matches!(s.as_str(), "p" | "d" | "l" | "r")).count()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::Literal;
    use crate::types::Relation;

    fn lit(relation: Relation, args: &[&str]) -> Literal {
        Literal::positive(relation, args.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_already_true_goal() {
        let world = WorldState::sample("small").unwrap();
        let dnf = Dnf::new(vec![vec![lit(Relation::Inside, &["f", "m"])]]);
        let steps = plan(&dnf, &world, DEFAULT_TIMEOUT).unwrap();
        assert_eq!(steps, vec!["That is already true!".to_string()]);
        assert_eq!(atom_count(&steps), 0);
    }

    #[test]
    fn test_take_plan_ends_with_pick() {
        let world = WorldState::sample("small").unwrap();
        let dnf = Dnf::new(vec![vec![lit(Relation::Holding, &["e"])]]);
        let steps = plan(&dnf, &world, DEFAULT_TIMEOUT).unwrap();
        // e is at the arm's column already: no motion needed
        assert_eq!(steps, vec!["Picking up the white ball".to_string(), "p".to_string()]);
    }

    #[test]
    fn test_plan_narrates_arm_motion() {
        let world = WorldState::sample("small").unwrap();
        let dnf = Dnf::new(vec![vec![lit(Relation::Holding, &["f"])]]);
        let steps = plan(&dnf, &world, DEFAULT_TIMEOUT).unwrap();
        assert_eq!(
            steps,
            vec![
                "Moving right".to_string(),
                "r".to_string(),
                "r".to_string(),
                "r".to_string(),
                "Picking up the black ball".to_string(),
                "p".to_string(),
            ]
        );
    }

    #[test]
    fn test_drop_only_plan_when_holding() {
        let mut world = WorldState::sample("small").unwrap();
        world.stacks[0].pop();
        world.holding = Some("e".into());
        world.arm = 0;
        // land e between l (column 1) and f (column 3): column 2 is empty
        let dnf = Dnf::new(vec![vec![lit(Relation::Between, &["e", "l", "f"])]]);
        let steps = plan(&dnf, &world, DEFAULT_TIMEOUT).unwrap();
        let picks = steps.iter().filter(|s| s.as_str() == "p").count();
        let drops = steps.iter().filter(|s| s.as_str() == "d").count();
        assert_eq!(picks, 0, "already holding, no pick: {:?}", steps);
        assert_eq!(drops, 1, "a single drop: {:?}", steps);
        assert_eq!(
            steps,
            vec![
                "Moving right".to_string(),
                "r".to_string(),
                "r".to_string(),
                "Dropping the white ball".to_string(),
                "d".to_string(),
            ]
        );
    }

    #[test]
    fn test_executed_plan_reaches_goal() {
        let world = WorldState::sample("small").unwrap();
        let objects = world.objects.clone();
        let dnf = Dnf::new(vec![vec![lit(Relation::Inside, &["e", "l"])]]);
        let steps = plan(&dnf, &world, DEFAULT_TIMEOUT).unwrap();

        let mut after = world.clone();
        after.apply_plan(&steps).expect("emitted plan should execute");
        let node = WorldNode::from_world(&after);
        assert!(dnf.holds_in(&node, &objects), "goal should hold after execution");
    }

    #[test]
    fn test_multi_step_plan_atoms_match_cost() {
        let world = WorldState::sample("small").unwrap();
        // put the black ball on the floor: f must leave the box stack
        let dnf = Dnf::new(vec![vec![lit(Relation::OnTop, &["f", "floor"])]]);
        let steps = plan(&dnf, &world, DEFAULT_TIMEOUT).unwrap();
        let picks_and_drops = steps.iter().filter(|s| matches!(s.as_str(), "p" | "d")).count();
        assert_eq!(picks_and_drops, 2, "one pick and one drop: {:?}", steps);

        let mut after = world.clone();
        after.apply_plan(&steps).unwrap();
        let f = after.find("f").unwrap();
        assert_eq!(f.stack_location, 0, "f should rest on the floor");
    }

    #[test]
    fn test_unreachable_goal_errors() {
        let world = WorldState::sample("small").unwrap();
        // nothing can ever rest on a ball, so above(g, e) is unreachable
        let dnf = Dnf::new(vec![vec![lit(Relation::Above, &["g", "e"])]]);
        let err = plan(&dnf, &world, DEFAULT_TIMEOUT).unwrap_err();
        assert!(
            matches!(err, EngineError::Internal(_) | EngineError::Timeout),
            "got: {:?}",
            err
        );
    }
}
