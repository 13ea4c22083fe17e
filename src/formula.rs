//! Goal formulas: literals, conjunctions, and the DNF the interpreter
//! produces and the planner consumes.
//!
//! A DNF is an OR of ANDs of elementary spatial assertions. The empty DNF
//! is unsatisfiable; a DNF containing one empty conjunction is trivially
//! true. Formulas are built once and read many times by the goal test and
//! the heuristic, so satisfaction checks take a search node, not a world.

use std::collections::BTreeMap;
use std::fmt;

use crate::graph::WorldNode;
use crate::physics;
use crate::types::{Id, ObjectDef, Relation};

// ---------------------------------------------------------------------------
// Literal
// ---------------------------------------------------------------------------

/// An elementary spatial assertion, `rel(args…)` with 1–3 arguments.
/// `polarity` is preserved for negative goals but every generated literal
/// is positive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub polarity: bool,
    pub relation: Relation,
    pub args: Vec<Id>,
}

impl Literal {
    pub fn positive(relation: Relation, args: Vec<Id>) -> Self {
        Self { polarity: true, relation, args }
    }

    /// Is this literal satisfied in the given search node?
    /// Unknown identifiers never satisfy anything.
    pub fn holds_in(&self, node: &WorldNode, objects: &BTreeMap<Id, ObjectDef>) -> bool {
        let a = match self.args.first().and_then(|id| node.locate(id, objects)) {
            Some(found) => found,
            None => return false,
        };
        let b = match self.args.get(1) {
            Some(id) => match node.locate(id, objects) {
                Some(found) => Some(found),
                None => return false,
            },
            None => None,
        };
        let c = match self.args.get(2) {
            Some(id) => match node.locate(id, objects) {
                Some(found) => Some(found),
                None => return false,
            },
            None => None,
        };
        let truth = physics::has_valid_location(&a, self.relation, b.as_ref(), c.as_ref());
        truth == self.polarity
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.polarity {
            write!(f, "-")?;
        }
        write!(f, "{}({})", self.relation, self.args.join(","))
    }
}

// ---------------------------------------------------------------------------
// Conjunction and DNF
// ---------------------------------------------------------------------------

/// An ordered AND of literals.
pub type Conjunction = Vec<Literal>;

/// Render a conjunction as `lit & lit & …`.
pub fn format_conjunction(conjunction: &Conjunction) -> String {
    conjunction.iter().map(|l| l.to_string()).collect::<Vec<_>>().join(" & ")
}

/// An ordered OR of conjunctions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dnf {
    pub conjunctions: Vec<Conjunction>,
}

impl Dnf {
    pub fn new(conjunctions: Vec<Conjunction>) -> Self {
        Self { conjunctions }
    }

    pub fn empty() -> Self {
        Self { conjunctions: Vec::new() }
    }

    /// The empty DNF can never be satisfied.
    pub fn is_unsatisfiable(&self) -> bool {
        self.conjunctions.is_empty()
    }

    /// Is some conjunction fully satisfied in the node? This is the
    /// planner's goal predicate.
    pub fn holds_in(&self, node: &WorldNode, objects: &BTreeMap<Id, ObjectDef>) -> bool {
        self.conjunctions
            .iter()
            .any(|conj| conj.iter().all(|lit| lit.holds_in(node, objects)))
    }
}

impl fmt::Display for Dnf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.conjunctions.is_empty() {
            return write!(f, "<unsatisfiable>");
        }
        let parts: Vec<String> = self.conjunctions.iter().map(|c| format_conjunction(c)).collect();
        write!(f, "{}", parts.join(" | "))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
