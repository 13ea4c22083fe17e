//! Extraction of the typed `Command` AST from a parse tree.
//!
//! The grammar guarantees the shape of each node, so extraction is a
//! direct walk; a mismatch is an internal error, not a parse failure
//! the user can do anything about.

use crate::nl::earley::ParseNode;
use crate::nl::lexicon::Lexicon;
use crate::types::{
    Command, EngineError, Entity, Location, Object, ObjectDef, Relation, Result,
};

/// Convert a completed `Command` parse tree into the typed AST.
pub fn extract_command(tree: &ParseNode, lexicon: &Lexicon) -> Result<Command> {
    let children = tree.children();
    let verb = children
        .first()
        .ok_or_else(|| EngineError::Internal("command tree without a verb".into()))?;

    match verb.label() {
        "take" => {
            let entity = extract_entity(child(children, 1)?, lexicon)?;
            Ok(Command::Take(entity))
        }
        "move" => {
            let entity = extract_entity(child(children, 1)?, lexicon)?;
            let location = extract_location(child(children, 2)?, lexicon)?;
            Ok(Command::Move(entity, location))
        }
        "put" => {
            let location = extract_location(child(children, 2)?, lexicon)?;
            Ok(Command::Put(location))
        }
        other => Err(EngineError::Internal(format!("unknown verb category '{}'", other))),
    }
}

fn child<'a>(children: &'a [ParseNode], index: usize) -> Result<&'a ParseNode> {
    children
        .get(index)
        .ok_or_else(|| EngineError::Internal("parse tree node is missing a child".into()))
}

fn leaf_token<'a>(node: &'a ParseNode) -> Result<&'a str> {
    node.token()
        .ok_or_else(|| EngineError::Internal("expected a leaf token".into()))
}

fn extract_entity(node: &ParseNode, lexicon: &Lexicon) -> Result<Entity> {
    let children = node.children();
    let quantifier_token = leaf_token(child(children, 0)?)?;
    let quantifier = lexicon.quantifier_of(quantifier_token).ok_or_else(|| {
        EngineError::Internal(format!("'{}' is not a quantifier", quantifier_token))
    })?;
    let object = extract_object(child(children, 1)?, lexicon)?;
    Ok(Entity { quantifier, object })
}

fn extract_object(node: &ParseNode, lexicon: &Lexicon) -> Result<Object> {
    let children = node.children();

    // Object → Object Location
    if children.len() == 2 && children[1].label() == "Location" {
        let object = extract_object(child(children, 0)?, lexicon)?;
        let location = extract_location(child(children, 1)?, lexicon)?;
        return Ok(Object::Nested { object: Box::new(object), location: Box::new(location) });
    }

    // Object → attribute leaves ending in a form
    let mut descriptor = ObjectDef::of_form(crate::types::Form::Anyform);
    for leaf in children {
        let token = leaf_token(leaf)?;
        match leaf.label() {
            "size" => {
                descriptor.size = lexicon.size_of(token);
            }
            "color" => {
                descriptor.color = lexicon.color_of(token);
            }
            "form" => {
                descriptor.form = lexicon.form_of(token).ok_or_else(|| {
                    EngineError::Internal(format!("'{}' is not a form", token))
                })?;
            }
            other => {
                return Err(EngineError::Internal(format!(
                    "unexpected object attribute '{}'",
                    other
                )))
            }
        }
    }
    Ok(Object::Leaf(descriptor))
}

fn extract_location(node: &ParseNode, lexicon: &Lexicon) -> Result<Location> {
    let children = node.children();
    let head = child(children, 0)?;

    match head.label() {
        "relation" => {
            let token = leaf_token(head)?;
            let relation = lexicon
                .relation_of(token)
                .ok_or_else(|| EngineError::Internal(format!("'{}' is not a relation", token)))?;
            let entity = extract_entity(child(children, 1)?, lexicon)?;
            Ok(Location { relation, entity, entity2: None })
        }
        "between" => {
            let entity = extract_entity(child(children, 1)?, lexicon)?;
            let entity2 = extract_entity(child(children, 3)?, lexicon)?;
            Ok(Location { relation: Relation::Between, entity, entity2: Some(entity2) })
        }
        other => Err(EngineError::Internal(format!("unknown location head '{}'", other))),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
