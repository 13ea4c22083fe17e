//! World definitions: YAML schema, embedded sample worlds, and the
//! `WorldState` the whole pipeline reads.
//!
//! A world is a row of stacks (columns of objects resting on the floor,
//! bottom-indexed 0), an optional held object, the gripper-arm column, and
//! the object catalog. Worlds are authored as YAML packs and validated on
//! load; two samples (`small`, `medium`) are embedded in the binary.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::types::{EngineError, FoundObject, Id, ObjectDef, Result, FLOOR_ID};

// ---------------------------------------------------------------------------
// Embedded sample worlds
// ---------------------------------------------------------------------------

const SMALL_WORLD: &str = include_str!("../data/worlds/small.yaml");
const MEDIUM_WORLD: &str = include_str!("../data/worlds/medium.yaml");

/// Names of the embedded sample worlds.
pub const SAMPLE_WORLDS: &[&str] = &["small", "medium"];

// ---------------------------------------------------------------------------
// WorldState
// ---------------------------------------------------------------------------

/// The complete state of a blocks world. Read-only to the pipeline; the
/// interactive shell owns a mutable copy and advances it with
/// [`WorldState::apply_action`] after a plan is produced.
///
/// Invariants (checked on load): every identifier appears at most once
/// across stacks ∪ holding; all identifiers are in the catalog; `arm` is
/// within stack bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldState {
    #[serde(default)]
    pub name: String,
    pub stacks: Vec<Vec<Id>>,
    #[serde(default)]
    pub holding: Option<Id>,
    #[serde(default)]
    pub arm: usize,
    /// BTreeMap so candidate enumeration iterates identifiers in a stable
    /// lexicographic order.
    pub objects: BTreeMap<Id, ObjectDef>,
}

impl WorldState {
    /// Load a world from a YAML string and validate its invariants.
    pub fn load_str(yaml: &str) -> Result<Self> {
        let world: WorldState = serde_yaml::from_str(yaml)?;
        world.validate()?;
        Ok(world)
    }

    /// Load a world from a YAML file on disk.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::load_str(&yaml)
    }

    /// Load one of the embedded sample worlds by name.
    pub fn sample(name: &str) -> Result<Self> {
        match name {
            "small" => Self::load_str(SMALL_WORLD),
            "medium" => Self::load_str(MEDIUM_WORLD),
            other => Err(EngineError::World(format!("unknown sample world '{}'", other))),
        }
    }

    fn validate(&self) -> Result<()> {
        let mut placed: Vec<&str> = self.stacks.iter().flatten().map(|id| id.as_str()).collect();
        if let Some(held) = &self.holding {
            placed.push(held.as_str());
        }
        let mut seen = std::collections::HashSet::new();
        for id in placed {
            if id == FLOOR_ID {
                return Err(EngineError::World("'floor' is a reserved identifier".into()));
            }
            if !self.objects.contains_key(id) {
                return Err(EngineError::World(format!("identifier '{}' is not in the catalog", id)));
            }
            if !seen.insert(id) {
                return Err(EngineError::World(format!("identifier '{}' appears twice", id)));
            }
        }
        if !self.stacks.is_empty() && self.arm >= self.stacks.len() {
            return Err(EngineError::World(format!(
                "arm column {} out of bounds for {} stacks",
                self.arm,
                self.stacks.len()
            )));
        }
        Ok(())
    }

    // -- Lookup ----------------------------------------------------------

    /// The definition of an identifier; the floor sentinel is always known.
    pub fn def(&self, id: &str) -> Option<ObjectDef> {
        if id == FLOOR_ID {
            return Some(ObjectDef::floor());
        }
        self.objects.get(id).copied()
    }

    /// Locate an identifier in the world. `None` for identifiers that are
    /// in the catalog but neither on a stack nor held.
    pub fn find(&self, id: &str) -> Option<FoundObject> {
        if id == FLOOR_ID {
            return Some(FoundObject::floor());
        }
        let def = self.objects.get(id).copied()?;
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

    /// All identifiers that currently exist: on a stack, held, plus the
    /// floor sentinel last. Stable lexicographic order over the catalog.
    pub fn existing_ids(&self) -> Vec<Id> {
        let mut ids: Vec<Id> = self
            .objects
            .keys()
            .filter(|id| self.find(id).is_some())
            .cloned()
            .collect();
        ids.push(FLOOR_ID.to_string());
        ids
    }

    // -- Plan execution --------------------------------------------------

    /// Apply one atomic action (`p`, `d`, `l`, `r`) to this world.
    /// Narration lines are not actions and are rejected.
    pub fn apply_action(&mut self, action: &str) -> Result<()> {
        match action {
            "l" => {
                if self.arm == 0 {
                    return Err(EngineError::World("arm already at leftmost column".into()));
                }
                self.arm -= 1;
                Ok(())
            }
            "r" => {
                if self.arm + 1 >= self.stacks.len() {
                    return Err(EngineError::World("arm already at rightmost column".into()));
                }
                self.arm += 1;
                Ok(())
            }
            "p" => {
                if self.holding.is_some() {
                    return Err(EngineError::World("cannot pick: gripper is loaded".into()));
                }
                let stack = self
                    .stacks
                    .get_mut(self.arm)
                    .ok_or_else(|| EngineError::World("arm is over no column".into()))?;
                let id = stack
                    .pop()
                    .ok_or_else(|| EngineError::World("cannot pick from an empty column".into()))?;
                self.holding = Some(id);
                Ok(())
            }
            "d" => {
                if self.arm >= self.stacks.len() {
                    return Err(EngineError::World("arm is over no column".into()));
                }
                let id = self
                    .holding
                    .take()
                    .ok_or_else(|| EngineError::World("cannot drop: gripper is empty".into()))?;
                self.stacks[self.arm].push(id);
                Ok(())
            }
            other => Err(EngineError::World(format!("unknown action '{}'", other))),
        }
    }

    /// Apply every atomic action in a plan, skipping narration lines.
    pub fn apply_plan(&mut self, plan: &[String]) -> Result<()> {
        for step in plan {
            if matches!(step.as_str(), "l" | "r" | "p" | "d") {
                self.apply_action(step)?;
            }
        }
        Ok(())
    }

    // -- Rendering -------------------------------------------------------

    /// Render the world as ASCII columns, gripper marker on top.
    pub fn render(&self) -> String {
        let cols = self.stacks.len();
        let width = 4;
        let height = self.stacks.iter().map(|s| s.len()).max().unwrap_or(0);
        let mut out = String::new();

        let mut gripper = String::new();
        for _ in 0..self.arm {
            gripper.push_str(&" ".repeat(width));
        }
        let marker = match &self.holding {
            Some(id) => format!("[{}]", id),
            None => "\\_/".to_string(),
        };
        gripper.push_str(&format!("{:^width$}", marker, width = width));
        out.push_str(gripper.trim_end());
        out.push('\n');

        for row in (0..height).rev() {
            let mut line = String::new();
            for stack in &self.stacks {
                match stack.get(row) {
                    Some(id) => line.push_str(&format!("{:^width$}", id, width = width)),
                    None => line.push_str(&" ".repeat(width)),
                }
            }
            out.push_str(line.trim_end());
            out.push('\n');
        }

        out.push_str(&"-".repeat(width * cols.max(1)));
        out.push('\n');
        for i in 0..cols {
            out.push_str(&format!("{:^width$}", i, width = width));
        }
        out.push('\n');
        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
