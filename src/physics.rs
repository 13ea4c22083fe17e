//! Pure predicates over the blocks world: the stacking laws, the truth of a
//! spatial relation in a current arrangement, the in-principle achievability
//! of a rearrangement goal, descriptor matching, and object descriptions.
//!
//! Nothing here touches state; every function is a pure function of its
//! arguments, which is what makes the goal test and the heuristic safe to
//! call on speculative search nodes.

use crate::types::{
    EngineError, Form, FoundObject, ObjectDef, Relation, Result, Size, FLOOR_ID,
};
use crate::world::WorldState;

// ---------------------------------------------------------------------------
// Stacking laws
// ---------------------------------------------------------------------------

/// May `top` rest directly on `bottom`?
///
/// The physical laws, in check order:
/// 1. the floor is never a top object
/// 2. everything may rest on the floor
/// 3. balls support nothing
/// 4. balls may only rest in boxes (the floor case is handled above)
/// 5. small objects never support large objects
/// 6. a box cannot contain a plank, pyramid, or box of its own size
/// 7. small boxes cannot rest on pyramids or on small supports
/// 8. large boxes cannot rest on large pyramids
pub fn stacking_allowed(top: &ObjectDef, bottom: &ObjectDef) -> bool {
    if top.form == Form::Floor {
        return false;
    }
    if bottom.form == Form::Floor {
        return true;
    }
    if bottom.form == Form::Ball {
        return false;
    }
    if top.form == Form::Ball {
        return bottom.form == Form::Box;
    }
    if bottom.size == Some(Size::Small) && top.size == Some(Size::Large) {
        return false;
    }
    if bottom.form == Form::Box
        && matches!(top.form, Form::Plank | Form::Pyramid | Form::Box)
        && top.size == bottom.size
    {
        return false;
    }
    if top.form == Form::Box && top.size == Some(Size::Small) {
        if bottom.form == Form::Pyramid || bottom.size == Some(Size::Small) {
            return false;
        }
    }
    if top.form == Form::Box
        && top.size == Some(Size::Large)
        && bottom.form == Form::Pyramid
        && bottom.size == Some(Size::Large)
    {
        return false;
    }
    true
}

// ---------------------------------------------------------------------------
// Relation truth in a current arrangement
// ---------------------------------------------------------------------------

/// Does the current arrangement satisfy `rel` for these objects?
///
/// `b` is unused for `holding`; `c` is only read for `between`. Held
/// participants falsify every relation except `holding`; the floor can only
/// appear as the target of `ontop` and `above`.
pub fn has_valid_location(
    a: &FoundObject,
    rel: Relation,
    b: Option<&FoundObject>,
    c: Option<&FoundObject>,
) -> bool {
    if rel != Relation::Holding {
        let any_held =
            a.is_held || b.map_or(false, |o| o.is_held) || c.map_or(false, |o| o.is_held);
        if any_held {
            return false;
        }
    }
    if a.is_floor {
        return false;
    }

    match rel {
        Relation::Holding => a.is_held,
        Relation::LeftOf => match b {
            Some(b) => a.on_some_stack() && b.on_some_stack() && a.stack_id < b.stack_id,
            None => false,
        },
        Relation::RightOf => match b {
            Some(b) => a.on_some_stack() && b.on_some_stack() && a.stack_id > b.stack_id,
            None => false,
        },
        Relation::Beside => match b {
            Some(b) => {
                a.on_some_stack() && b.on_some_stack() && (a.stack_id - b.stack_id).abs() == 1
            }
            None => false,
        },
        Relation::Between => match (b, c) {
            (Some(b), Some(c)) => {
                a.on_some_stack()
                    && b.on_some_stack()
                    && c.on_some_stack()
                    && ((b.stack_id < a.stack_id && a.stack_id < c.stack_id)
                        || (c.stack_id < a.stack_id && a.stack_id < b.stack_id))
            }
            _ => false,
        },
        Relation::Inside => match b {
            Some(b) => {
                b.def.form == Form::Box
                    && a.on_some_stack()
                    && b.on_some_stack()
                    && a.stack_id == b.stack_id
                    && a.stack_location == b.stack_location + 1
                    && !(b.def.size == Some(Size::Small) && a.def.size == Some(Size::Large))
            }
            None => false,
        },
        Relation::OnTop => match b {
            Some(b) if b.is_floor => a.on_some_stack() && a.stack_location == 0,
            Some(b) => {
                a.on_some_stack()
                    && b.on_some_stack()
                    && a.stack_id == b.stack_id
                    && a.stack_location == b.stack_location + 1
                    && stacking_allowed(&a.def, &b.def)
            }
            None => false,
        },
        Relation::Under => match b {
            Some(b) => {
                a.on_some_stack()
                    && b.on_some_stack()
                    && a.stack_id == b.stack_id
                    && a.stack_location < b.stack_location
            }
            None => false,
        },
        Relation::Above => match b {
            Some(b) if b.is_floor => a.on_some_stack(),
            Some(b) => {
                a.on_some_stack()
                    && b.on_some_stack()
                    && a.stack_id == b.stack_id
                    && a.stack_location > b.stack_location
            }
            None => false,
        },
    }
}

// ---------------------------------------------------------------------------
// Goal feasibility
// ---------------------------------------------------------------------------

/// Is the rearrangement goal `rel(a, b[, c])` in principle achievable?
///
/// Rejects identities, the floor as a subject, the floor as anything but an
/// `ontop`/`above` target, non-box `inside` targets, size-violating
/// containment, and unsupportable `ontop` pairings. Purely positional
/// relations are always feasible.
pub fn is_valid_goal_location(
    a_id: &str,
    a_def: &ObjectDef,
    rel: Relation,
    b_id: &str,
    b_def: &ObjectDef,
    c: Option<(&str, &ObjectDef)>,
) -> bool {
    if a_id == b_id {
        return false;
    }
    if a_def.form == Form::Floor {
        return false;
    }
    if let Some((c_id, c_def)) = c {
        if a_id == c_id || b_id == c_id {
            return false;
        }
        if b_def.form == Form::Floor || c_def.form == Form::Floor {
            return false;
        }
    }
    if b_def.form == Form::Floor {
        return matches!(rel, Relation::OnTop | Relation::Above);
    }
    match rel {
        Relation::Inside => {
            b_def.form == Form::Box
                && !(b_def.size == Some(Size::Small) && a_def.size == Some(Size::Large))
        }
        Relation::OnTop => stacking_allowed(a_def, b_def),
        _ => true,
    }
}

// ---------------------------------------------------------------------------
// Descriptor matching
// ---------------------------------------------------------------------------

/// Does a parsed descriptor match an object definition? `Anyform` matches
/// every real form; absent size/color match anything.
pub fn has_same_attributes(descr: &ObjectDef, def: &ObjectDef) -> bool {
    let form_ok = descr.form == def.form
        || (descr.form == Form::Anyform && def.form != Form::Floor);
    let size_ok = descr.size.map_or(true, |s| def.size == Some(s));
    let color_ok = descr.color.map_or(true, |c| def.color == Some(c));
    form_ok && size_ok && color_ok
}

// ---------------------------------------------------------------------------
// Descriptions
// ---------------------------------------------------------------------------

/// The full "size color form" description of a definition.
pub fn full_description(def: &ObjectDef) -> String {
    let mut parts = Vec::new();
    if let Some(size) = def.size {
        parts.push(size.to_string());
    }
    if let Some(color) = def.color {
        parts.push(color.to_string());
    }
    parts.push(def.form.to_string());
    parts.join(" ")
}

/// The shortest of `form`, `color form`, `size color form` that uniquely
/// names the object among the world's existing objects. If even the full
/// description matches several distinct objects, no phrase can name this
/// one and [`EngineError::DescriptionAmbiguous`] is raised.
pub fn minimal_description(id: &str, world: &WorldState) -> Result<String> {
    if id == FLOOR_ID {
        return Ok("floor".to_string());
    }
    let def = world
        .def(id)
        .ok_or_else(|| EngineError::Internal(format!("no definition for '{}'", id)))?;

    let attempts = [
        ObjectDef { form: def.form, size: None, color: None },
        ObjectDef { form: def.form, size: None, color: def.color },
        ObjectDef { form: def.form, size: def.size, color: def.color },
    ];

    for descr in &attempts {
        let matches = world
            .existing_ids()
            .iter()
            .filter(|other| *other != FLOOR_ID)
            .filter(|other| {
                world
                    .def(other)
                    .map_or(false, |other_def| has_same_attributes(descr, &other_def))
            })
            .count();
        if matches == 1 {
            return Ok(full_description(descr));
        }
    }
    Err(EngineError::DescriptionAmbiguous(full_description(&def)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Color;

    fn def(form: Form, size: Size, color: Color) -> ObjectDef {
        ObjectDef { form, size: Some(size), color: Some(color) }
    }

    // -- stacking laws --

    #[test]
    fn test_floor_is_never_a_top_object() {
        let floor = ObjectDef::floor();
        let brick = def(Form::Brick, Size::Large, Color::Green);
        assert!(!stacking_allowed(&floor, &brick));
        assert!(!stacking_allowed(&floor, &floor));
    }

    #[test]
    fn test_everything_rests_on_the_floor() {
        let floor = ObjectDef::floor();
        for form in [Form::Brick, Form::Plank, Form::Ball, Form::Box, Form::Pyramid, Form::Table] {
            let top = def(form, Size::Large, Color::Red);
            assert!(stacking_allowed(&top, &floor), "{} should rest on floor", form);
        }
    }

    #[test]
    fn test_balls_support_nothing() {
        let ball = def(Form::Ball, Size::Large, Color::White);
        for form in [Form::Brick, Form::Plank, Form::Ball, Form::Box, Form::Pyramid, Form::Table] {
            let top = def(form, Size::Small, Color::Red);
            assert!(!stacking_allowed(&top, &ball), "{} should not rest on a ball", form);
        }
    }

    #[test]
    fn test_balls_only_in_boxes() {
        let ball = def(Form::Ball, Size::Small, Color::Black);
        let boxdef = def(Form::Box, Size::Small, Color::Blue);
        let table = def(Form::Table, Size::Large, Color::Blue);
        assert!(stacking_allowed(&ball, &boxdef));
        assert!(!stacking_allowed(&ball, &table));
    }

    #[test]
    fn test_small_never_supports_large() {
        let small_brick = def(Form::Brick, Size::Small, Color::White);
        let large_plank = def(Form::Plank, Size::Large, Color::Red);
        assert!(!stacking_allowed(&large_plank, &small_brick));
        let small_plank = def(Form::Plank, Size::Small, Color::Green);
        assert!(stacking_allowed(&small_plank, &small_brick));
    }

    #[test]
    fn test_box_cannot_contain_its_own_size_plank_pyramid_box() {
        let large_box = def(Form::Box, Size::Large, Color::Yellow);
        assert!(!stacking_allowed(&def(Form::Plank, Size::Large, Color::Red), &large_box));
        assert!(!stacking_allowed(&def(Form::Pyramid, Size::Large, Color::Yellow), &large_box));
        assert!(!stacking_allowed(&def(Form::Box, Size::Large, Color::Red), &large_box));
        // smaller contents fit
        assert!(stacking_allowed(&def(Form::Plank, Size::Small, Color::Green), &large_box));
        assert!(stacking_allowed(&def(Form::Box, Size::Small, Color::Blue), &large_box));
    }

    #[test]
    fn test_small_box_support_restrictions() {
        let small_box = def(Form::Box, Size::Small, Color::Blue);
        assert!(!stacking_allowed(&small_box, &def(Form::Brick, Size::Small, Color::White)));
        assert!(!stacking_allowed(&small_box, &def(Form::Pyramid, Size::Large, Color::Yellow)));
        assert!(!stacking_allowed(&small_box, &def(Form::Table, Size::Small, Color::Red)));
        assert!(stacking_allowed(&small_box, &def(Form::Table, Size::Large, Color::Blue)));
    }

    #[test]
    fn test_large_box_not_on_large_pyramid() {
        let large_box = def(Form::Box, Size::Large, Color::Yellow);
        let large_pyramid = def(Form::Pyramid, Size::Large, Color::Yellow);
        assert!(!stacking_allowed(&large_box, &large_pyramid));
        let large_brick = def(Form::Brick, Size::Large, Color::Green);
        assert!(stacking_allowed(&large_box, &large_brick));
    }

    // -- relation truth --

    fn ball_at(stack: usize, loc: usize) -> FoundObject {
        FoundObject::on_stack(def(Form::Ball, Size::Large, Color::White), stack, loc)
    }

    fn box_at(stack: usize, loc: usize) -> FoundObject {
        FoundObject::on_stack(def(Form::Box, Size::Large, Color::Yellow), stack, loc)
    }

    #[test]
    fn test_leftof_rightof_beside() {
        let a = ball_at(0, 0);
        let b = box_at(3, 0);
        assert!(has_valid_location(&a, Relation::LeftOf, Some(&b), None));
        assert!(!has_valid_location(&a, Relation::RightOf, Some(&b), None));
        assert!(has_valid_location(&b, Relation::RightOf, Some(&a), None));
        assert!(!has_valid_location(&a, Relation::Beside, Some(&b), None));
        let c = box_at(1, 0);
        assert!(has_valid_location(&a, Relation::Beside, Some(&c), None));
    }

    #[test]
    fn test_between_either_order() {
        let mid = ball_at(2, 0);
        let left = box_at(0, 0);
        let right = box_at(4, 0);
        assert!(has_valid_location(&mid, Relation::Between, Some(&left), Some(&right)));
        assert!(has_valid_location(&mid, Relation::Between, Some(&right), Some(&left)));
        let outside = ball_at(5, 0);
        assert!(!has_valid_location(&outside, Relation::Between, Some(&left), Some(&right)));
    }

    #[test]
    fn test_held_objects_falsify_positional_relations() {
        let held = FoundObject::held(def(Form::Ball, Size::Large, Color::White));
        let b = box_at(1, 0);
        assert!(!has_valid_location(&held, Relation::LeftOf, Some(&b), None));
        assert!(!has_valid_location(&b, Relation::Beside, Some(&held), None));
        assert!(has_valid_location(&held, Relation::Holding, None, None));
        assert!(!has_valid_location(&b, Relation::Holding, None, None));
    }

    #[test]
    fn test_inside_requires_box_directly_below() {
        let boxdef = box_at(3, 1);
        let ball = FoundObject::on_stack(def(Form::Ball, Size::Small, Color::Black), 3, 2);
        assert!(has_valid_location(&ball, Relation::Inside, Some(&boxdef), None));

        let elsewhere = FoundObject::on_stack(def(Form::Ball, Size::Small, Color::Black), 2, 0);
        assert!(!has_valid_location(&elsewhere, Relation::Inside, Some(&boxdef), None));

        // a large object is not inside a small box even if stacked there
        let small_box = FoundObject::on_stack(def(Form::Box, Size::Small, Color::Blue), 1, 0);
        let large = FoundObject::on_stack(def(Form::Brick, Size::Large, Color::Green), 1, 1);
        assert!(!has_valid_location(&large, Relation::Inside, Some(&small_box), None));
    }

    #[test]
    fn test_ontop_floor_and_stack() {
        let floor = FoundObject::floor();
        let bottom = ball_at(0, 0);
        assert!(has_valid_location(&bottom, Relation::OnTop, Some(&floor), None));
        let lifted = box_at(0, 1);
        assert!(!has_valid_location(&lifted, Relation::OnTop, Some(&floor), None));
        assert!(has_valid_location(&lifted, Relation::Above, Some(&floor), None));
        // floor is never a subject
        assert!(!has_valid_location(&floor, Relation::OnTop, Some(&bottom), None));
    }

    #[test]
    fn test_under_and_above_same_stack_only() {
        let low = box_at(2, 0);
        let high = FoundObject::on_stack(def(Form::Ball, Size::Small, Color::Black), 2, 1);
        assert!(has_valid_location(&low, Relation::Under, Some(&high), None));
        assert!(has_valid_location(&high, Relation::Above, Some(&low), None));
        let other = box_at(3, 0);
        assert!(!has_valid_location(&low, Relation::Under, Some(&other), None));
    }

    // -- goal feasibility --

    #[test]
    fn test_goal_rejects_identity() {
        let ball = def(Form::Ball, Size::Large, Color::White);
        assert!(!is_valid_goal_location("e", &ball, Relation::Beside, "e", &ball, None));
    }

    #[test]
    fn test_goal_rejects_floor_subject() {
        let floor = ObjectDef::floor();
        let ball = def(Form::Ball, Size::Large, Color::White);
        assert!(!is_valid_goal_location(FLOOR_ID, &floor, Relation::LeftOf, "e", &ball, None));
    }

    #[test]
    fn test_goal_floor_target_only_ontop_above() {
        let ball = def(Form::Ball, Size::Large, Color::White);
        let floor = ObjectDef::floor();
        assert!(is_valid_goal_location("e", &ball, Relation::OnTop, FLOOR_ID, &floor, None));
        assert!(is_valid_goal_location("e", &ball, Relation::Above, FLOOR_ID, &floor, None));
        assert!(!is_valid_goal_location("e", &ball, Relation::Inside, FLOOR_ID, &floor, None));
        assert!(!is_valid_goal_location("e", &ball, Relation::Beside, FLOOR_ID, &floor, None));
    }

    #[test]
    fn test_goal_inside_needs_fitting_box() {
        let large_ball = def(Form::Ball, Size::Large, Color::White);
        let small_box = def(Form::Box, Size::Small, Color::Blue);
        let large_box = def(Form::Box, Size::Large, Color::Yellow);
        let table = def(Form::Table, Size::Large, Color::Blue);
        assert!(!is_valid_goal_location("e", &large_ball, Relation::Inside, "m", &small_box, None));
        assert!(is_valid_goal_location("e", &large_ball, Relation::Inside, "k", &large_box, None));
        assert!(!is_valid_goal_location("e", &large_ball, Relation::Inside, "g", &table, None));
    }

    #[test]
    fn test_goal_ontop_needs_support() {
        let ball = def(Form::Ball, Size::Large, Color::White);
        let table = def(Form::Table, Size::Large, Color::Blue);
        assert!(!is_valid_goal_location("e", &ball, Relation::OnTop, "g", &table, None));
        let brick = def(Form::Brick, Size::Small, Color::White);
        let plank = def(Form::Plank, Size::Large, Color::Red);
        assert!(is_valid_goal_location("b", &brick, Relation::OnTop, "c", &plank, None));
    }

    #[test]
    fn test_goal_between_needs_three_distinct_non_floor() {
        let ball = def(Form::Ball, Size::Large, Color::White);
        let box1 = def(Form::Box, Size::Large, Color::Yellow);
        let box2 = def(Form::Box, Size::Large, Color::Red);
        let floor = ObjectDef::floor();
        assert!(is_valid_goal_location("e", &ball, Relation::Between, "k", &box1, Some(("l", &box2))));
        assert!(!is_valid_goal_location("e", &ball, Relation::Between, "k", &box1, Some(("k", &box1))));
        assert!(!is_valid_goal_location(
            "e",
            &ball,
            Relation::Between,
            "k",
            &box1,
            Some((FLOOR_ID, &floor))
        ));
    }

    // -- descriptor matching --

    #[test]
    fn test_descriptor_matching() {
        let white_ball = def(Form::Ball, Size::Large, Color::White);
        assert!(has_same_attributes(&ObjectDef::of_form(Form::Ball), &white_ball));
        assert!(has_same_attributes(&ObjectDef::of_form(Form::Anyform), &white_ball));
        assert!(!has_same_attributes(&ObjectDef::of_form(Form::Anyform), &ObjectDef::floor()));
        let descr = ObjectDef { form: Form::Ball, size: None, color: Some(Color::Black) };
        assert!(!has_same_attributes(&descr, &white_ball));
    }

    // -- descriptions --

    #[test]
    fn test_minimal_description_prefers_shortest() {
        let world = WorldState::sample("small").unwrap();
        // two balls exist, so the bare form is ambiguous but color disambiguates
        assert_eq!(minimal_description("e", &world).unwrap(), "white ball");
        assert_eq!(minimal_description("f", &world).unwrap(), "black ball");
        // g is the only table placed in the world
        assert_eq!(minimal_description("g", &world).unwrap(), "table");
        // k and l are both large boxes; color is needed
        assert_eq!(minimal_description("k", &world).unwrap(), "yellow box");
    }

    #[test]
    fn test_minimal_description_collision() {
        let yaml = r#"
stacks: [[x], [y]]
objects:
  x: { form: brick, size: small, color: red }
  y: { form: brick, size: small, color: red }
"#;
        let world = WorldState::load_str(yaml).unwrap();
        let err = minimal_description("x", &world).unwrap_err();
        assert!(
            matches!(err, EngineError::DescriptionAmbiguous(ref d) if d == "small red brick"),
            "got: {:?}",
            err
        );
    }
}
