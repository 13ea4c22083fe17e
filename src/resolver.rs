//! Reference resolution: map each noun phrase to the identifiers that could
//! satisfy it in the current world, recursively through nested spatial
//! relations.
//!
//! Resolution is shallow: a nested level only requires that *some* binding
//! of its inner candidates works, and the tie-breaks between multiple legal
//! bindings are deferred to formula construction, where the cross products
//! are expanded.

use crate::physics;
use crate::types::{Entity, Id, Object, Relation};
use crate::world::WorldState;

/// Candidate identifier sets for one noun phrase, mirroring its nesting.
#[derive(Debug, Clone)]
pub struct Candidates {
    /// Identifiers that satisfy the phrase, in stable world order.
    pub main: Vec<Id>,
    /// The relation constraining this phrase, when nested.
    pub relation: Option<Relation>,
    /// Candidates of the related entity, when nested.
    pub nested: Option<Box<Candidates>>,
    /// Candidates of the second related entity (`between` only).
    pub nested2: Option<Box<Candidates>>,
}

impl Candidates {
    fn plain(main: Vec<Id>) -> Self {
        Self { main, relation: None, nested: None, nested2: None }
    }
}

/// Resolve an entity's noun phrase against the world.
pub fn resolve_entity(entity: &Entity, world: &WorldState) -> Candidates {
    resolve_object(&entity.object, world)
}

fn resolve_object(object: &Object, world: &WorldState) -> Candidates {
    match object {
        Object::Leaf(descr) => {
            let main = world
                .existing_ids()
                .into_iter()
                .filter(|id| {
                    world
                        .def(id)
                        .map_or(false, |def| physics::has_same_attributes(descr, &def))
                })
                .collect();
            Candidates::plain(main)
        }
        Object::Nested { object, location } => {
            let base = resolve_object(object, world);
            let nested = resolve_entity(&location.entity, world);
            let nested2 = location.entity2.as_ref().map(|e| resolve_entity(e, world));

            let main = base
                .main
                .iter()
                .filter(|id| {
                    let a = match world.find(id) {
                        Some(found) => found,
                        None => return false,
                    };
                    nested.main.iter().any(|g| {
                        let b = match world.find(g) {
                            Some(found) => found,
                            None => return false,
                        };
                        match &nested2 {
                            None => physics::has_valid_location(
                                &a,
                                location.relation,
                                Some(&b),
                                None,
                            ),
                            Some(n2) => n2.main.iter().any(|g2| {
                                world.find(g2).map_or(false, |c| {
                                    physics::has_valid_location(
                                        &a,
                                        location.relation,
                                        Some(&b),
                                        Some(&c),
                                    )
                                })
                            }),
                        }
                    })
                })
                .cloned()
                .collect();

            Candidates {
                main,
                relation: Some(location.relation),
                nested: Some(Box::new(nested)),
                nested2: nested2.map(Box::new),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
