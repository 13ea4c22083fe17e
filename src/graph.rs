//! The planner's state graph: `WorldNode` identity and the lazy successor
//! generator enumerating every physically legal pick/drop transition.

use std::collections::BTreeMap;

use crate::physics;
use crate::types::{FoundObject, Id, ObjectDef, FLOOR_ID};
use crate::world::WorldState;

/// A search node: the held object plus the full stack contents.
///
/// The arm column is deliberately not part of node identity — arm motion
/// costs nothing during search, so folding it in would only multiply the
/// state space. Every edge out of a node is a single pick or drop, cost 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorldNode {
    pub holding: Option<Id>,
    pub stacks: Vec<Vec<Id>>,
}

impl WorldNode {
    pub fn from_world(world: &WorldState) -> Self {
        Self { holding: world.holding.clone(), stacks: world.stacks.clone() }
    }

    /// Locate an identifier within this node, using the catalog for
    /// definitions. Mirrors [`WorldState::find`] but over speculative
    /// stack contents.
    pub fn locate(&self, id: &str, objects: &BTreeMap<Id, ObjectDef>) -> Option<FoundObject> {
        if id == FLOOR_ID {
            return Some(FoundObject::floor());
        }
        let def = objects.get(id).copied()?;
        if self.holding.as_deref() == Some(id) {
            return Some(FoundObject::held(def));
        }
        for (stack_id, stack) in self.stacks.iter().enumerate() {
            if let Some(loc) = stack.iter().position(|x| x == id) {
                return Some(FoundObject::on_stack(def, stack_id, loc));
            }
        }
        None
    }

    /// Number of objects stacked above `id`. Zero for held objects, the
    /// floor, and absent identifiers.
    pub fn above_count(&self, id: &str) -> usize {
        for stack in &self.stacks {
            if let Some(loc) = stack.iter().position(|x| x == id) {
                return stack.len() - loc - 1;
            }
        }
        0
    }

    /// The height of the shortest column.
    pub fn min_stack_height(&self) -> usize {
        self.stacks.iter().map(|s| s.len()).min().unwrap_or(0)
    }

    /// Every legal single-action successor of this node.
    ///
    /// Empty gripper: pop the top of each non-empty column. Loaded gripper:
    /// drop onto each column whose top supports the held object (an empty
    /// column is the floor, which supports everything).
    pub fn successors(&self, objects: &BTreeMap<Id, ObjectDef>) -> Vec<WorldNode> {
        let mut out = Vec::new();
        match &self.holding {
            None => {
                for (i, stack) in self.stacks.iter().enumerate() {
                    if stack.is_empty() {
                        continue;
                    }
                    let mut next = self.clone();
                    let top = next.stacks[i].pop();
                    next.holding = top;
                    out.push(next);
                }
            }
            Some(held) => {
                let held_def = match objects.get(held) {
                    Some(def) => *def,
                    None => return out,
                };
                for (i, stack) in self.stacks.iter().enumerate() {
                    let supported = match stack.last() {
                        Some(top) => objects
                            .get(top)
                            .map_or(false, |top_def| physics::stacking_allowed(&held_def, top_def)),
                        None => true,
                    };
                    if !supported {
                        continue;
                    }
                    let mut next = self.clone();
                    next.stacks[i].push(held.clone());
                    next.holding = None;
                    out.push(next);
                }
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
