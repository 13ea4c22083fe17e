//! Grammar for the blocks-world command language.
//!
//! ```text
//! Command  → 'take' Entity
//! Command  → 'move' Entity Location
//! Command  → 'put' 'pronoun' Location
//! Entity   → 'quantifier' Object
//! Object   → 'size'? 'color'? 'form'        (attribute prefixes)
//! Object   → Object Location                (nested: "the ball in a box")
//! Location → 'relation' Entity
//! Location → 'between' Entity 'conjunction' Entity
//! ```
//!
//! Terminal symbols name lexicon categories, not words. The nested-object
//! rule is left-recursive and deliberately ambiguous: attachment choices
//! like "put a ball in a box on the floor" produce several trees, all of
//! which are passed downstream.

use crate::nl::earley::{Grammar, Rule, Symbol};

fn nt(name: &str) -> Symbol {
    Symbol::NonTerminal(name.to_string())
}

fn t(category: &str) -> Symbol {
    Symbol::Terminal(category.to_string())
}

/// Build the command grammar.
pub fn build_command_grammar() -> Grammar {
    let mut rules = Vec::new();

    // ── Command (top-level) ──────────────────────────────────────────
    rules.push(Rule::new("Command", vec![t("take"), nt("Entity")]));
    rules.push(Rule::new("Command", vec![t("move"), nt("Entity"), nt("Location")]));
    rules.push(Rule::new("Command", vec![t("put"), t("pronoun"), nt("Location")]));

    // ── Entity ───────────────────────────────────────────────────────
    rules.push(Rule::new("Entity", vec![t("quantifier"), nt("Object")]));

    // ── Object: attribute-prefixed form ──────────────────────────────
    rules.push(Rule::new("Object", vec![t("form")]));
    rules.push(Rule::weighted("Object", vec![t("size"), t("form")], 1.1));
    rules.push(Rule::weighted("Object", vec![t("color"), t("form")], 1.1));
    rules.push(Rule::weighted("Object", vec![t("size"), t("color"), t("form")], 1.2));
    // "white large ball" is unusual but accepted
    rules.push(Rule::weighted("Object", vec![t("color"), t("size"), t("form")], 0.9));

    // ── Object: nested location ──────────────────────────────────────
    rules.push(Rule::new("Object", vec![nt("Object"), nt("Location")]));

    // ── Location ─────────────────────────────────────────────────────
    rules.push(Rule::new("Location", vec![t("relation"), nt("Entity")]));
    rules.push(Rule::new(
        "Location",
        vec![t("between"), nt("Entity"), t("conjunction"), nt("Entity")],
    ));

    Grammar::new("Command", rules)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nl::earley::{self, RankedParse};
    use crate::nl::lexicon::lexicon;
    use crate::nl::normalize::normalize;

    fn parse_input(input: &str) -> Vec<RankedParse> {
        let grammar = build_command_grammar();
        let lex = lexicon();
        let tokens = normalize(input, lex);
        earley::parse(&grammar, &tokens, lex)
    }

    #[test]
    fn test_take_the_white_ball() {
        let parses = parse_input("take the white ball");
        assert_eq!(parses.len(), 1, "should parse unambiguously");
        let tree = &parses[0].tree;
        assert_eq!(tree.label(), "Command");
        assert_eq!(tree.children()[0].token(), Some("take"));
        let entity = tree.find("Entity").expect("should have Entity");
        assert_eq!(entity.leaf_tokens(), vec!["the", "white", "ball"]);
    }

    #[test]
    fn test_move_with_location() {
        let parses = parse_input("move the ball inside a large box");
        assert_eq!(parses.len(), 1);
        let location = parses[0].tree.find("Location").expect("should have Location");
        assert_eq!(location.leaf_tokens(), vec!["inside", "a", "large", "box"]);
    }

    #[test]
    fn test_put_it_on_the_floor() {
        let parses = parse_input("put it on the floor");
        assert_eq!(parses.len(), 1);
        let tree = &parses[0].tree;
        assert_eq!(tree.children()[1].label(), "pronoun");
    }

    #[test]
    fn test_between_location() {
        let parses = parse_input("put the white ball between a box and a box");
        assert_eq!(parses.len(), 1);
        let location = parses[0].tree.find("Location").expect("should have Location");
        assert_eq!(location.children().len(), 4, "between Entity and Entity");
    }

    #[test]
    fn test_attachment_ambiguity() {
        let parses = parse_input("put a ball in a box on the floor");
        assert_eq!(parses.len(), 2, "both attachments should parse");
    }

    #[test]
    fn test_nested_relative_clause() {
        let parses = parse_input("take the ball that is in the box");
        assert_eq!(parses.len(), 1);
        let object = parses[0].tree.find("Object").expect("object");
        assert_eq!(object.children().len(), 2, "Object → Object Location");
    }

    #[test]
    fn test_bare_verb_does_not_parse() {
        assert!(parse_input("take").is_empty());
        assert!(parse_input("put it").is_empty());
    }

    #[test]
    fn test_gibberish_does_not_parse() {
        assert!(parse_input("colorless green ideas sleep furiously").is_empty());
    }
}
