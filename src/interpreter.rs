//! Goal-formula construction: turn a parsed command plus resolved
//! candidates into the DNF the planner searches for.
//!
//! The quantifier semantics drive the shape of the formula. Without `all`,
//! every feasible candidate binding becomes its own single-literal
//! disjunct. With `all` on one side of a relation, every mapping from the
//! `all` side into the other side becomes a conjunction; with `all` on
//! both sides the full cross product must hold simultaneously. The ternary
//! `between` enumerates the same structure over its three slots.

use crate::clarify;
use crate::formula::{Conjunction, Dnf, Literal};
use crate::physics;
use crate::resolver;
use crate::types::{
    Command, EngineError, Entity, Id, Location, Quantifier, Relation, Result, FLOOR_ID,
};
use crate::world::WorldState;

/// Hard cap on assignment enumeration. `all` over large candidate sets is
/// exponential; past this bound the interpretation is reported infeasible
/// rather than ground the process.
const MAX_ASSIGNMENTS: usize = 50_000;

/// Interpret a command against the world: build the DNF, reject empty
/// formulas, then run the `the` disambiguation pass.
pub fn interpret(command: &Command, world: &WorldState) -> Result<Dnf> {
    let dnf = build_dnf(command, world)?;
    if dnf.is_unsatisfiable() {
        return Err(EngineError::NoInterpretation);
    }
    clarify::check(command, &dnf, world)?;
    Ok(dnf)
}

fn build_dnf(command: &Command, world: &WorldState) -> Result<Dnf> {
    match command {
        Command::Take(entity) => build_take(entity, world),
        Command::Move(entity, location) => {
            let candidates = resolver::resolve_entity(entity, world);
            // the floor can never be picked up
            let targets: Vec<Id> =
                candidates.main.into_iter().filter(|id| id != FLOOR_ID).collect();
            build_relation_dnf(&targets, entity.quantifier == Quantifier::All, location, world)
        }
        Command::Put(location) => {
            // the held object is the only candidate; empty if the gripper is
            let targets: Vec<Id> = world.holding.clone().into_iter().collect();
            build_relation_dnf(&targets, false, location, world)
        }
    }
}

// ---------------------------------------------------------------------------
// take
// ---------------------------------------------------------------------------

fn build_take(entity: &Entity, world: &WorldState) -> Result<Dnf> {
    let candidates = resolver::resolve_entity(entity, world);
    let mains: Vec<Id> = candidates.main.into_iter().filter(|id| id != FLOOR_ID).collect();

    if entity.quantifier == Quantifier::All {
        return match mains.len() {
            0 => Ok(Dnf::empty()),
            1 => Ok(Dnf::new(vec![vec![Literal::positive(
                Relation::Holding,
                vec![mains[0].clone()],
            )]])),
            _ => Err(EngineError::Infeasible("Only one object can be held at a time!".into())),
        };
    }

    Ok(Dnf::new(
        mains
            .into_iter()
            .map(|m| vec![Literal::positive(Relation::Holding, vec![m])])
            .collect(),
    ))
}

// ---------------------------------------------------------------------------
// move / put
// ---------------------------------------------------------------------------

fn build_relation_dnf(
    targets: &[Id],
    target_all: bool,
    location: &Location,
    world: &WorldState,
) -> Result<Dnf> {
    let goals = resolver::resolve_entity(&location.entity, world).main;
    let relation = location.relation;

    if relation == Relation::Between {
        let entity2 = location
            .entity2
            .as_ref()
            .ok_or_else(|| EngineError::Internal("between without a second entity".into()))?;
        let goals2 = resolver::resolve_entity(entity2, world).main;
        return build_between_dnf(
            targets,
            target_all,
            &goals,
            location.entity.quantifier == Quantifier::All,
            &goals2,
            entity2.quantifier == Quantifier::All,
            world,
        );
    }

    let goal_all = location.entity.quantifier == Quantifier::All;
    let make = |t: &Id, g: &Id| binary_literal(t, relation, g, world);

    let conjunctions = match (target_all, goal_all) {
        (false, false) => {
            let mut out = Vec::new();
            for t in targets {
                for g in &goals {
                    if let Some(lit) = make(t, g) {
                        out.push(vec![lit]);
                    }
                }
            }
            out
        }
        (true, true) => full_product_conjunction(targets, &goals, make),
        (true, false) => mapping_conjunctions(targets, &goals, |t, g| make(t, g))?,
        (false, true) => mapping_conjunctions(&goals, targets, |g, t| make(t, g))?,
    };

    let filtered: Vec<Conjunction> =
        conjunctions.into_iter().filter(|c| !double_occupancy(c)).collect();
    Ok(Dnf::new(filtered))
}

/// One literal `rel(t, g)` if the goal is in principle achievable.
fn binary_literal(t: &Id, relation: Relation, g: &Id, world: &WorldState) -> Option<Literal> {
    let t_def = world.def(t)?;
    let g_def = world.def(g)?;
    if physics::is_valid_goal_location(t, &t_def, relation, g, &g_def, None) {
        Some(Literal::positive(relation, vec![t.clone(), g.clone()]))
    } else {
        None
    }
}

/// Both sides `all`: one conjunction over the full cross product, or
/// nothing at all if any single pairing is infeasible.
fn full_product_conjunction<F>(targets: &[Id], goals: &[Id], make: F) -> Vec<Conjunction>
where
    F: Fn(&Id, &Id) -> Option<Literal>,
{
    if targets.is_empty() || goals.is_empty() {
        return Vec::new();
    }
    let mut conjunction = Vec::with_capacity(targets.len() * goals.len());
    for t in targets {
        for g in goals {
            match make(t, g) {
                Some(lit) => conjunction.push(lit),
                None => return Vec::new(),
            }
        }
    }
    vec![conjunction]
}

/// One side `all`: every mapping from the `all` side into the free side
/// becomes a conjunction; mappings containing an infeasible literal are
/// discarded.
fn mapping_conjunctions<X, Y, F>(
    all_side: &[X],
    free_side: &[Y],
    make: F,
) -> Result<Vec<Conjunction>>
where
    F: Fn(&X, &Y) -> Option<Literal>,
{
    if all_side.is_empty() || free_side.is_empty() {
        return Ok(Vec::new());
    }
    let combos = assignments(all_side.len(), free_side.len())?;
    let mut out = Vec::new();
    'combo: for combo in combos {
        let mut conjunction = Vec::with_capacity(all_side.len());
        for (i, &choice) in combo.iter().enumerate() {
            match make(&all_side[i], &free_side[choice]) {
                Some(lit) => conjunction.push(lit),
                None => continue 'combo,
            }
        }
        out.push(conjunction);
    }
    Ok(out)
}

/// Every length-`n` sequence of values in `[0..m)`, by recursive
/// accumulation. Repetition allowed; `m^n` sequences in total.
fn assignments(n: usize, m: usize) -> Result<Vec<Vec<usize>>> {
    let mut total: usize = 1;
    for _ in 0..n {
        total = total.saturating_mul(m);
        if total > MAX_ASSIGNMENTS {
            return Err(EngineError::Internal(format!(
                "too many goal combinations ({} candidates over {} slots)",
                m, n
            )));
        }
    }
    let mut out: Vec<Vec<usize>> = vec![Vec::new()];
    for _ in 0..n {
        let mut next = Vec::with_capacity(out.len() * m);
        for prefix in &out {
            for value in 0..m {
                let mut seq = prefix.clone();
                seq.push(value);
                next.push(seq);
            }
        }
        out = next;
    }
    Ok(out)
}

/// A stack position supports one direct child: reject conjunctions that
/// put two distinct objects ontop of / inside the same non-floor target.
fn double_occupancy(conjunction: &Conjunction) -> bool {
    let mut placements: Vec<(&str, &str)> = Vec::new();
    for literal in conjunction {
        if !matches!(literal.relation, Relation::OnTop | Relation::Inside) {
            continue;
        }
        if let (Some(object), Some(target)) = (literal.args.first(), literal.args.get(1)) {
            if target == FLOOR_ID {
                continue;
            }
            if placements.iter().any(|(t, o)| t == target && o != object) {
                return true;
            }
            placements.push((target, object));
        }
    }
    false
}

// ---------------------------------------------------------------------------
// between
// ---------------------------------------------------------------------------

fn between_literal(t: &Id, g1: &Id, g2: &Id, world: &WorldState) -> Option<Literal> {
    let t_def = world.def(t)?;
    let g1_def = world.def(g1)?;
    let g2_def = world.def(g2)?;
    if physics::is_valid_goal_location(
        t,
        &t_def,
        Relation::Between,
        g1,
        &g1_def,
        Some((g2, &g2_def)),
    ) {
        Some(Literal::positive(Relation::Between, vec![t.clone(), g1.clone(), g2.clone()]))
    } else {
        None
    }
}

/// Ordered pairs from two candidate lists.
fn cross(a: &[Id], b: &[Id]) -> Vec<(Id, Id)> {
    let mut out = Vec::with_capacity(a.len() * b.len());
    for x in a {
        for y in b {
            out.push((x.clone(), y.clone()));
        }
    }
    out
}

/// The seven `all`-mask cases of the ternary relation, plus the plain
/// cross product when no slot bears `all`. Partial cases map the `all`
/// slots into pair-indexed combinations of the free slots.
#[allow(clippy::too_many_arguments)]
fn build_between_dnf(
    targets: &[Id],
    t_all: bool,
    goals1: &[Id],
    g1_all: bool,
    goals2: &[Id],
    g2_all: bool,
    world: &WorldState,
) -> Result<Dnf> {
    if targets.is_empty() || goals1.is_empty() || goals2.is_empty() {
        return Ok(Dnf::empty());
    }
    let make = |t: &Id, g1: &Id, g2: &Id| between_literal(t, g1, g2, world);

    let conjunctions = match (t_all, g1_all, g2_all) {
        (false, false, false) => {
            let mut out = Vec::new();
            for t in targets {
                for g1 in goals1 {
                    for g2 in goals2 {
                        if let Some(lit) = make(t, g1, g2) {
                            out.push(vec![lit]);
                        }
                    }
                }
            }
            out
        }
        (true, true, true) => {
            let mut conjunction = Vec::new();
            for t in targets {
                for g1 in goals1 {
                    for g2 in goals2 {
                        match make(t, g1, g2) {
                            Some(lit) => conjunction.push(lit),
                            None => return Ok(Dnf::empty()),
                        }
                    }
                }
            }
            vec![conjunction]
        }
        (true, false, false) => {
            mapping_conjunctions(targets, &cross(goals1, goals2), |t, (g1, g2)| {
                make(t, g1, g2)
            })?
        }
        (false, true, false) => {
            mapping_conjunctions(goals1, &cross(targets, goals2), |g1, (t, g2)| {
                make(t, g1, g2)
            })?
        }
        (false, false, true) => {
            mapping_conjunctions(goals2, &cross(targets, goals1), |g2, (t, g1)| {
                make(t, g1, g2)
            })?
        }
        (true, true, false) => {
            mapping_conjunctions(&cross(targets, goals1), goals2, |(t, g1), g2| {
                make(t, g1, g2)
            })?
        }
        (true, false, true) => {
            mapping_conjunctions(&cross(targets, goals2), goals1, |(t, g2), g1| {
                make(t, g1, g2)
            })?
        }
        (false, true, true) => {
            mapping_conjunctions(&cross(goals1, goals2), targets, |(g1, g2), t| {
                make(t, g1, g2)
            })?
        }
    };
    Ok(Dnf::new(conjunctions))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
