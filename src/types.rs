use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Object attributes — the vocabulary every world object is described in
// ---------------------------------------------------------------------------

/// The shape of an object. `Anyform` is a descriptor wildcard matching every
/// real form; `Floor` is a sentinel handled specially by the physics layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Form {
    Brick,
    Plank,
    Ball,
    Box,
    Pyramid,
    Table,
    Anyform,
    Floor,
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Brick => write!(f, "brick"),
            Self::Plank => write!(f, "plank"),
            Self::Ball => write!(f, "ball"),
            Self::Box => write!(f, "box"),
            Self::Pyramid => write!(f, "pyramid"),
            Self::Table => write!(f, "table"),
            Self::Anyform => write!(f, "object"),
            Self::Floor => write!(f, "floor"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Size {
    Small,
    Large,
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Small => write!(f, "small"),
            Self::Large => write!(f, "large"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    White,
    Red,
    Green,
    Blue,
    Yellow,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Black => write!(f, "black"),
            Self::White => write!(f, "white"),
            Self::Red => write!(f, "red"),
            Self::Green => write!(f, "green"),
            Self::Blue => write!(f, "blue"),
            Self::Yellow => write!(f, "yellow"),
        }
    }
}

/// An object definition. World objects carry all three attributes; parsed
/// descriptors leave size/color unset when the utterance did not name them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDef {
    pub form: Form,
    #[serde(default)]
    pub size: Option<Size>,
    #[serde(default)]
    pub color: Option<Color>,
}

impl ObjectDef {
    pub fn of_form(form: Form) -> Self {
        Self { form, size: None, color: None }
    }

    /// The floor sentinel definition.
    pub fn floor() -> Self {
        Self::of_form(Form::Floor)
    }
}

/// Identifier of a world object ("a", "b", …) or the floor sentinel.
pub type Id = String;

/// The identifier reserved for the floor.
pub const FLOOR_ID: &str = "floor";

// ---------------------------------------------------------------------------
// FoundObject — the physics-layer projection of one object's situation
// ---------------------------------------------------------------------------

/// Where an object currently is. Exactly one of `is_floor`, `is_held`, or
/// "on a stack" (non-negative coordinates) holds; held and floor objects
/// carry sentinel coordinates of −1.
#[derive(Debug, Clone)]
pub struct FoundObject {
    pub def: ObjectDef,
    pub is_floor: bool,
    pub is_held: bool,
    pub stack_id: i32,
    pub stack_location: i32,
}

impl FoundObject {
    pub fn floor() -> Self {
        Self {
            def: ObjectDef::floor(),
            is_floor: true,
            is_held: false,
            stack_id: -1,
            stack_location: -1,
        }
    }

    pub fn held(def: ObjectDef) -> Self {
        Self { def, is_floor: false, is_held: true, stack_id: -1, stack_location: -1 }
    }

    pub fn on_stack(def: ObjectDef, stack_id: usize, stack_location: usize) -> Self {
        Self {
            def,
            is_floor: false,
            is_held: false,
            stack_id: stack_id as i32,
            stack_location: stack_location as i32,
        }
    }

    /// True when the object sits in some column (neither held nor the floor).
    pub fn on_some_stack(&self) -> bool {
        !self.is_held && !self.is_floor
    }
}

// ---------------------------------------------------------------------------
// Spatial relations
// ---------------------------------------------------------------------------

/// The spatial relations the command language can express. `Between` is
/// ternary; `Holding` is unary; the rest are binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    LeftOf,
    RightOf,
    Beside,
    Above,
    Under,
    OnTop,
    Inside,
    Between,
    Holding,
}

impl Relation {
    /// Number of identifier arguments a literal of this relation carries.
    pub fn arity(&self) -> usize {
        match self {
            Self::Holding => 1,
            Self::Between => 3,
            _ => 2,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LeftOf => write!(f, "leftof"),
            Self::RightOf => write!(f, "rightof"),
            Self::Beside => write!(f, "beside"),
            Self::Above => write!(f, "above"),
            Self::Under => write!(f, "under"),
            Self::OnTop => write!(f, "ontop"),
            Self::Inside => write!(f, "inside"),
            Self::Between => write!(f, "between"),
            Self::Holding => write!(f, "holding"),
        }
    }
}

impl std::str::FromStr for Relation {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, ()> {
        match s {
            "leftof" => Ok(Self::LeftOf),
            "rightof" => Ok(Self::RightOf),
            "beside" => Ok(Self::Beside),
            "above" => Ok(Self::Above),
            "under" => Ok(Self::Under),
            "ontop" => Ok(Self::OnTop),
            "inside" => Ok(Self::Inside),
            "between" => Ok(Self::Between),
            "holding" => Ok(Self::Holding),
            _ => Err(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Command AST — the parsed shape of an utterance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    /// Unique referent; more than one admissible binding is an error.
    The,
    /// Any one candidate suffices; the planner picks the cheapest.
    Any,
    /// Every matching object must satisfy the goal.
    All,
}

/// A noun phrase: a quantifier plus an object description.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub quantifier: Quantifier,
    pub object: Object,
}

/// An object description. Either a bare attribute descriptor or a
/// descriptor constrained by a spatial relation ("the ball in a box").
/// Nesting is tree-shaped, never cyclic, so owned recursion suffices.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Leaf(ObjectDef),
    Nested {
        object: Box<Object>,
        location: Box<Location>,
    },
}

/// A spatial constraint. `entity2` is present iff `relation == Between`.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub relation: Relation,
    pub entity: Entity,
    pub entity2: Option<Entity>,
}

/// A parsed command. `take` names an entity; `put` places the held object
/// at a location; `move` names both.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Take(Entity),
    Move(Entity, Location),
    Put(Location),
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

fn choice_list(descriptions: &[String]) -> String {
    descriptions
        .iter()
        .enumerate()
        .map(|(i, d)| format!("({}) {}", i, d))
        .collect::<Vec<_>>()
        .join(" ")
}

fn clarify_list(descriptions: &[String]) -> String {
    descriptions
        .iter()
        .map(|d| format!("- {}?", d))
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum EngineError {
    #[error("Parsing error: {0}")]
    Parse(String),

    /// Several parses survive interpretation and planning; the user must
    /// pick one with the `(N) <text>` prefix.
    #[error("The utterance can be understood in different ways, do you want: {}", choice_list(.descriptions))]
    ParseChoice { descriptions: Vec<String> },

    /// A `the` quantifier admits several bindings; the user must refine.
    #[error("An ambiguity exists, did you mean: {}", clarify_list(.descriptions))]
    Clarify { descriptions: Vec<String> },

    /// Two distinct objects collapse to the same full description, so no
    /// clarification question can tell them apart.
    #[error("Several distinct objects all answer to \"{0}\"")]
    DescriptionAmbiguous(String),

    #[error("Sentence has no valid interpretation in world")]
    NoInterpretation,

    #[error("{0}")]
    Infeasible(String),

    #[error("Planning error: Search for goal timed out!")]
    Timeout,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("world error: {0}")]
    World(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("yaml parse error: {0}")]
    Yaml(String),
}

impl From<std::io::Error> for EngineError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_yaml::Error> for EngineError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Yaml(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
