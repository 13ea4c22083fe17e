//! Earley parser for the blocks-world command language.
//!
//! Implements Earley's algorithm for ambiguous context-free grammars and
//! returns every distinct parse tree, ranked by rule weight. Structural
//! ambiguity must survive parsing — "put a ball in a box on the floor"
//! yields two different trees over the same tokens — so chart items are
//! deduplicated by their full derivation, not just by dotted-rule
//! position, and final trees are deduplicated by shape.
//!
//! The grammar is small and free of epsilon rules, so this focused
//! implementation needs no external parsing crate.

use std::collections::HashSet;
use std::fmt;

// ---------------------------------------------------------------------------
// Grammar definition
// ---------------------------------------------------------------------------

/// A symbol in the grammar — either a non-terminal (rule name) or a
/// terminal (lexicon category that matches input tokens).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// A non-terminal: references a grammar rule by name.
    NonTerminal(String),
    /// A terminal: matches tokens belonging to a lexicon category.
    Terminal(String),
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::NonTerminal(s) => write!(f, "{}", s),
            Symbol::Terminal(s) => write!(f, "'{}'", s),
        }
    }
}

/// A production rule: LHS → RHS₁ RHS₂ ... RHSₙ
#[derive(Debug, Clone)]
pub struct Rule {
    pub lhs: String,
    pub rhs: Vec<Symbol>,
    /// Priority weight (higher = preferred when ranking parses).
    pub weight: f64,
}

impl Rule {
    pub fn new(lhs: impl Into<String>, rhs: Vec<Symbol>) -> Self {
        Self { lhs: lhs.into(), rhs, weight: 1.0 }
    }

    pub fn weighted(lhs: impl Into<String>, rhs: Vec<Symbol>, weight: f64) -> Self {
        Self { lhs: lhs.into(), rhs, weight }
    }
}

/// A context-free grammar: a set of rules plus a start symbol.
#[derive(Debug, Clone)]
pub struct Grammar {
    pub rules: Vec<Rule>,
    pub start: String,
}

impl Grammar {
    pub fn new(start: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self { start: start.into(), rules }
    }
}

// ---------------------------------------------------------------------------
// Lexicon interface (trait for token classification)
// ---------------------------------------------------------------------------

/// Trait for classifying tokens into lexicon categories. The parser uses
/// this to match Terminal symbols against input tokens.
pub trait TokenClassifier {
    /// All lexicon categories this token belongs to.
    /// E.g., "take" → ["take"], "white" → ["color"], "it" → ["pronoun"].
    fn classify(&self, token: &str) -> Vec<String>;
}

// ---------------------------------------------------------------------------
// Earley items and chart
// ---------------------------------------------------------------------------

/// An Earley item: a dotted rule with origin position plus the derivation
/// collected so far. Two items with the same dotted position but different
/// derivations are distinct — collapsing them would discard one reading of
/// an ambiguous span.
#[derive(Debug, Clone, PartialEq)]
struct EarleyItem {
    rule_idx: usize,
    /// Position of the dot within the rule's RHS (0 = start, len = complete).
    dot: usize,
    /// The chart position where this item started.
    origin: usize,
    /// Back-pointers for building the parse forest.
    completions: Vec<BackPointer>,
}

/// A back-pointer in the parse forest.
#[derive(Debug, Clone, PartialEq)]
enum BackPointer {
    /// A completed non-terminal with its own derivation.
    Completed { rule_idx: usize, completions: Vec<BackPointer> },
    /// A scanned terminal token.
    Scanned { category: String, token: String },
}

impl EarleyItem {
    fn new(rule_idx: usize, origin: usize) -> Self {
        Self { rule_idx, dot: 0, origin, completions: Vec::new() }
    }

    fn advanced(&self, bp: BackPointer) -> Self {
        let mut completions = self.completions.clone();
        completions.push(bp);
        Self { rule_idx: self.rule_idx, dot: self.dot + 1, origin: self.origin, completions }
    }

    fn is_complete(&self, grammar: &Grammar) -> bool {
        self.dot >= grammar.rules[self.rule_idx].rhs.len()
    }

    fn next_symbol<'a>(&self, grammar: &'a Grammar) -> Option<&'a Symbol> {
        grammar.rules[self.rule_idx].rhs.get(self.dot)
    }
}

type ChartSet = Vec<EarleyItem>;

fn push_unique(set: &mut ChartSet, item: EarleyItem) {
    if !set.contains(&item) {
        set.push(item);
    }
}

// ---------------------------------------------------------------------------
// Parse tree (output)
// ---------------------------------------------------------------------------

/// A node in the parse tree.
#[derive(Debug, Clone)]
pub enum ParseNode {
    /// An interior node: a non-terminal with children.
    Interior { label: String, children: Vec<ParseNode>, weight: f64 },
    /// A leaf node: a terminal token with its lexicon category.
    Leaf { category: String, token: String },
}

impl ParseNode {
    pub fn label(&self) -> &str {
        match self {
            ParseNode::Interior { label, .. } => label,
            ParseNode::Leaf { category, .. } => category,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            ParseNode::Leaf { token, .. } => Some(token),
            _ => None,
        }
    }

    pub fn children(&self) -> &[ParseNode] {
        match self {
            ParseNode::Interior { children, .. } => children,
            ParseNode::Leaf { .. } => &[],
        }
    }

    /// Total weight of this parse tree.
    pub fn total_weight(&self) -> f64 {
        match self {
            ParseNode::Interior { weight, children, .. } => {
                *weight + children.iter().map(|c| c.total_weight()).sum::<f64>()
            }
            ParseNode::Leaf { .. } => 0.0,
        }
    }

    /// All leaf tokens in order.
    pub fn leaf_tokens(&self) -> Vec<&str> {
        match self {
            ParseNode::Leaf { token, .. } => vec![token.as_str()],
            ParseNode::Interior { children, .. } => {
                children.iter().flat_map(|c| c.leaf_tokens()).collect()
            }
        }
    }

    /// First descendant with the given label, depth-first.
    pub fn find(&self, target_label: &str) -> Option<&ParseNode> {
        if self.label() == target_label {
            return Some(self);
        }
        if let ParseNode::Interior { children, .. } = self {
            for child in children {
                if let Some(found) = child.find(target_label) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// A canonical string for the tree's shape, used to deduplicate
    /// identical derivations while keeping genuinely different ones.
    pub fn fingerprint(&self) -> String {
        match self {
            ParseNode::Leaf { category, token } => format!("{}:{}", category, token),
            ParseNode::Interior { label, children, .. } => {
                let inner: Vec<String> = children.iter().map(|c| c.fingerprint()).collect();
                format!("({} {})", label, inner.join(" "))
            }
        }
    }
}

impl fmt::Display for ParseNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn fmt_indent(node: &ParseNode, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
            let pad = "  ".repeat(indent);
            match node {
                ParseNode::Leaf { category, token } => {
                    writeln!(f, "{}[{}] \"{}\"", pad, category, token)
                }
                ParseNode::Interior { label, children, .. } => {
                    writeln!(f, "{}({})", pad, label)?;
                    for child in children {
                        fmt_indent(child, f, indent + 1)?;
                    }
                    Ok(())
                }
            }
        }
        fmt_indent(self, f, 0)
    }
}

/// A ranked parse result.
#[derive(Debug, Clone)]
pub struct RankedParse {
    pub tree: ParseNode,
    pub score: f64,
}

// ---------------------------------------------------------------------------
// Earley parser
// ---------------------------------------------------------------------------

/// Parse the input tokens. Returns all distinct parse trees spanning the
/// full input, ranked by score (highest first).
///
/// The three Earley operations:
/// - **Predict**: dot before a non-terminal → add fresh items for its rules.
/// - **Scan**: dot before a terminal → advance if the next token carries
///   that lexicon category.
/// - **Complete**: dot at the end → advance every item that was waiting
///   for this non-terminal, carrying the derivation along.
pub fn parse(
    grammar: &Grammar,
    tokens: &[String],
    classifier: &dyn TokenClassifier,
) -> Vec<RankedParse> {
    if tokens.is_empty() {
        return Vec::new();
    }

    let n = tokens.len();
    let mut chart: Vec<ChartSet> = vec![Vec::new(); n + 1];

    for (idx, rule) in grammar.rules.iter().enumerate() {
        if rule.lhs == grammar.start {
            chart[0].push(EarleyItem::new(idx, 0));
        }
    }

    for i in 0..=n {
        let mut j = 0;
        while j < chart[i].len() {
            let item = chart[i][j].clone();

            if item.is_complete(grammar) {
                complete(grammar, &mut chart, &item, i);
            } else {
                match item.next_symbol(grammar) {
                    Some(Symbol::NonTerminal(nt)) => {
                        predict(grammar, &mut chart, nt, i);
                    }
                    Some(Symbol::Terminal(category)) => {
                        if i < n {
                            scan(&mut chart, &item, i, &tokens[i], category, classifier);
                        }
                    }
                    None => {}
                }
            }
            j += 1;
        }
    }

    // Extract completed parses of the start symbol spanning the full input.
    let mut parses = Vec::new();
    for item in &chart[n] {
        if item.is_complete(grammar)
            && grammar.rules[item.rule_idx].lhs == grammar.start
            && item.origin == 0
        {
            let tree = build_tree(grammar, item);
            let score = tree.total_weight();
            parses.push(RankedParse { tree, score });
        }
    }

    parses.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    // Deduplicate by tree shape; distinct readings of the same tokens stay.
    let mut seen = HashSet::new();
    parses.retain(|p| seen.insert(p.tree.fingerprint()));

    parses
}

// ---------------------------------------------------------------------------
// Earley operations
// ---------------------------------------------------------------------------

/// Predict: for each rule A → … where A is the non-terminal after the dot,
/// add A → •… to chart[pos]. Fresh items carry no derivation, so plain
/// containment dedup suffices.
fn predict(grammar: &Grammar, chart: &mut [ChartSet], nt: &str, pos: usize) {
    for (idx, rule) in grammar.rules.iter().enumerate() {
        if rule.lhs == nt {
            let item = EarleyItem::new(idx, pos);
            if !chart[pos].contains(&item) {
                chart[pos].push(item);
            }
        }
    }
}

/// Scan: if the next input token carries the terminal's category, advance
/// the dot into chart[pos + 1].
fn scan(
    chart: &mut [ChartSet],
    item: &EarleyItem,
    pos: usize,
    token: &str,
    category: &str,
    classifier: &dyn TokenClassifier,
) {
    let categories = classifier.classify(token);
    if categories.iter().any(|c| c == category) {
        let advanced = item.advanced(BackPointer::Scanned {
            category: category.to_string(),
            token: token.to_string(),
        });
        push_unique(&mut chart[pos + 1], advanced);
    }
}

/// Complete: when B → γ• finishes at `end`, advance every item in
/// chart[origin] waiting for B, attaching B's derivation as a back-pointer.
fn complete(grammar: &Grammar, chart: &mut [ChartSet], completed_item: &EarleyItem, end: usize) {
    let completed_lhs = &grammar.rules[completed_item.rule_idx].lhs;
    let origin = completed_item.origin;

    let waiting: Vec<EarleyItem> = chart[origin]
        .iter()
        .filter(|item| {
            matches!(item.next_symbol(grammar), Some(Symbol::NonTerminal(nt)) if nt == completed_lhs)
        })
        .cloned()
        .collect();

    for item in waiting {
        let advanced = item.advanced(BackPointer::Completed {
            rule_idx: completed_item.rule_idx,
            completions: completed_item.completions.clone(),
        });
        push_unique(&mut chart[end], advanced);
    }
}

// ---------------------------------------------------------------------------
// Parse tree construction from back-pointers
// ---------------------------------------------------------------------------

fn build_tree(grammar: &Grammar, item: &EarleyItem) -> ParseNode {
    let rule = &grammar.rules[item.rule_idx];
    ParseNode::Interior {
        label: rule.lhs.clone(),
        children: build_children(grammar, &item.completions),
        weight: rule.weight,
    }
}

fn build_children(grammar: &Grammar, completions: &[BackPointer]) -> Vec<ParseNode> {
    completions
        .iter()
        .map(|bp| match bp {
            BackPointer::Scanned { category, token } => {
                ParseNode::Leaf { category: category.clone(), token: token.clone() }
            }
            BackPointer::Completed { rule_idx, completions } => {
                let rule = &grammar.rules[*rule_idx];
                ParseNode::Interior {
                    label: rule.lhs.clone(),
                    children: build_children(grammar, completions),
                    weight: rule.weight,
                }
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct TestClassifier {
        map: HashMap<String, Vec<String>>,
    }

    impl TestClassifier {
        fn new(entries: &[(&str, &[&str])]) -> Self {
            let mut map = HashMap::new();
            for (token, cats) in entries {
                map.insert(token.to_string(), cats.iter().map(|c| c.to_string()).collect());
            }
            Self { map }
        }
    }

    impl TokenClassifier for TestClassifier {
        fn classify(&self, token: &str) -> Vec<String> {
            self.map.get(token).cloned().unwrap_or_default()
        }
    }

    fn nt(name: &str) -> Symbol {
        Symbol::NonTerminal(name.to_string())
    }

    fn t(category: &str) -> Symbol {
        Symbol::Terminal(category.to_string())
    }

    /// A miniature of the real command grammar, with the left-recursive
    /// nested-object rule that makes attachment ambiguous.
    fn mini_grammar() -> Grammar {
        Grammar::new(
            "Command",
            vec![
                Rule::new("Command", vec![t("verb"), nt("Entity"), nt("Location")]),
                Rule::new("Command", vec![t("takeverb"), nt("Entity")]),
                Rule::new("Entity", vec![t("quantifier"), nt("Object")]),
                Rule::new("Object", vec![t("form")]),
                Rule::new("Object", vec![nt("Object"), nt("Location")]),
                Rule::new("Location", vec![t("relation"), nt("Entity")]),
            ],
        )
    }

    fn mini_classifier() -> TestClassifier {
        TestClassifier::new(&[
            ("put", &["verb"]),
            ("take", &["takeverb"]),
            ("a", &["quantifier"]),
            ("the", &["quantifier"]),
            ("ball", &["form"]),
            ("box", &["form"]),
            ("floor", &["form"]),
            ("in", &["relation"]),
            ("on", &["relation"]),
        ])
    }

    fn toks(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_simple_take() {
        let parses = parse(&mini_grammar(), &toks(&["take", "the", "ball"]), &mini_classifier());
        assert_eq!(parses.len(), 1);
        let tree = &parses[0].tree;
        assert_eq!(tree.label(), "Command");
        assert_eq!(tree.children()[0].token(), Some("take"));
        let entity = tree.find("Entity").expect("should have Entity");
        assert_eq!(entity.leaf_tokens(), vec!["the", "ball"]);
    }

    #[test]
    fn test_structural_ambiguity_preserved() {
        // "put a ball in a box on the floor":
        //   reading 1: Entity(a ball) Location(in a box-on-the-floor)
        //   reading 2: Entity(a ball-in-a-box) Location(on the floor)
        let tokens = toks(&["put", "a", "ball", "in", "a", "box", "on", "the", "floor"]);
        let parses = parse(&mini_grammar(), &tokens, &mini_classifier());
        assert_eq!(parses.len(), 2, "both attachments should survive");
        let fingerprints: Vec<String> = parses.iter().map(|p| p.tree.fingerprint()).collect();
        assert_ne!(fingerprints[0], fingerprints[1], "the two trees must differ");
        for p in &parses {
            assert_eq!(p.tree.leaf_tokens().len(), 9, "each tree spans all tokens");
        }
    }

    #[test]
    fn test_left_recursive_nesting() {
        // "take the ball in a box" nests the location into the entity
        let tokens = toks(&["take", "the", "ball", "in", "a", "box"]);
        let parses = parse(&mini_grammar(), &tokens, &mini_classifier());
        assert_eq!(parses.len(), 1);
        let object = parses[0].tree.find("Object").expect("object node");
        assert_eq!(object.children().len(), 2, "Object → Object Location");
    }

    #[test]
    fn test_no_partial_parses() {
        let parses = parse(&mini_grammar(), &toks(&["take", "the"]), &mini_classifier());
        assert!(parses.is_empty(), "incomplete input should not parse");
    }

    #[test]
    fn test_empty_and_unknown_input() {
        assert!(parse(&mini_grammar(), &[], &mini_classifier()).is_empty());
        let parses = parse(&mini_grammar(), &toks(&["frobnicate", "wildly"]), &mini_classifier());
        assert!(parses.is_empty(), "unknown words should not parse");
    }

    #[test]
    fn test_weight_ranking() {
        // two rules accept the same input; the heavier should rank first
        let grammar = Grammar::new(
            "S",
            vec![
                Rule::weighted("S", vec![t("word"), nt("A")], 0.5),
                Rule::weighted("S", vec![t("word"), nt("B")], 2.0),
                Rule::new("A", vec![t("word")]),
                Rule::new("B", vec![t("word")]),
            ],
        );
        let classifier = TestClassifier::new(&[("x", &["word"])]);
        let parses = parse(&grammar, &toks(&["x", "x"]), &classifier);
        assert_eq!(parses.len(), 2);
        assert!(parses[0].score > parses[1].score);
        assert_eq!(parses[0].tree.children()[1].label(), "B");
    }

    #[test]
    fn test_identical_derivations_deduplicated() {
        // two paths to the same tree shape must collapse to one parse
        let grammar = Grammar::new(
            "S",
            vec![
                Rule::new("S", vec![nt("A")]),
                Rule::new("A", vec![t("word")]),
            ],
        );
        let classifier = TestClassifier::new(&[("x", &["word"])]);
        let parses = parse(&grammar, &toks(&["x"]), &classifier);
        assert_eq!(parses.len(), 1);
    }

    #[test]
    fn test_parse_node_display_and_fingerprint() {
        let node = ParseNode::Interior {
            label: "Command".to_string(),
            children: vec![
                ParseNode::Leaf { category: "verb".to_string(), token: "take".to_string() },
                ParseNode::Leaf { category: "form".to_string(), token: "ball".to_string() },
            ],
            weight: 1.0,
        };
        let display = format!("{}", node);
        assert!(display.contains("Command"));
        assert!(display.contains("take"));
        assert_eq!(node.fingerprint(), "(Command verb:take form:ball)");
    }
}
