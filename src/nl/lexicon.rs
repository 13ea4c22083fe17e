//! Lexicon loader for the command parser.
//!
//! Loads the vocabulary from the embedded `data/nl/lexicon.yaml`. Each
//! entry maps surface words (plus synonyms) to a grammar category and a
//! semantic value: verbs to command kinds, quantifier words to quantifier
//! semantics, relation words to relations, and attribute words to forms,
//! sizes, and colors. Adding a synonym is a YAML edit, not a code change.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Deserialize;

use crate::nl::earley::TokenClassifier;
use crate::types::{Color, EngineError, Form, Quantifier, Relation, Result, Size};

// ---------------------------------------------------------------------------
// Embedded vocabulary
// ---------------------------------------------------------------------------

const EMBEDDED_LEXICON: &str = include_str!("../../data/nl/lexicon.yaml");

// ---------------------------------------------------------------------------
// YAML schema
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct LexiconYaml {
    verbs: Vec<VerbEntry>,
    quantifiers: Vec<QuantifierEntry>,
    relations: Vec<RelationEntry>,
    forms: Vec<FormEntry>,
    sizes: Vec<SizeEntry>,
    colors: Vec<String>,
    pronouns: Vec<String>,
    conjunctions: Vec<String>,
    #[serde(default)]
    phrases: Vec<PhraseEntry>,
}

#[derive(Debug, Deserialize)]
struct VerbEntry {
    word: String,
    command: String,
    #[serde(default)]
    synonyms: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct QuantifierEntry {
    word: String,
    semantics: String,
    #[serde(default)]
    synonyms: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RelationEntry {
    word: String,
    relation: String,
    #[serde(default)]
    synonyms: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct FormEntry {
    word: String,
    form: Form,
    #[serde(default)]
    synonyms: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SizeEntry {
    word: String,
    size: Size,
    #[serde(default)]
    synonyms: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PhraseEntry {
    skeleton: Vec<String>,
    canonical: String,
}

// ---------------------------------------------------------------------------
// Runtime lexicon
// ---------------------------------------------------------------------------

/// A multi-word phrase canonicalized to a single token before parsing.
/// An empty canonical token drops the phrase entirely.
#[derive(Debug, Clone)]
pub struct PhraseGroup {
    pub skeleton: Vec<String>,
    pub canonical: String,
}

/// The loaded vocabulary, indexed for lookup during parsing and command
/// extraction.
#[derive(Debug)]
pub struct Lexicon {
    /// Token → grammar categories. "put" belongs to both "move" and "put".
    categories: HashMap<String, Vec<String>>,
    quantifiers: HashMap<String, Quantifier>,
    relations: HashMap<String, Relation>,
    forms: HashMap<String, Form>,
    sizes: HashMap<String, Size>,
    colors: HashMap<String, Color>,
    /// Phrase groups, longest skeleton first.
    pub phrases: Vec<PhraseGroup>,
}

impl Lexicon {
    fn from_yaml(yaml: &str) -> Result<Self> {
        let parsed: LexiconYaml = serde_yaml::from_str(yaml)?;

        let mut categories: HashMap<String, Vec<String>> = HashMap::new();
        let mut add = |word: &str, category: &str| {
            let cats = categories.entry(word.to_string()).or_default();
            if !cats.iter().any(|c| c == category) {
                cats.push(category.to_string());
            }
        };

        for entry in &parsed.verbs {
            let cats: &[&str] = match entry.command.as_str() {
                "take" => &["take"],
                "move" => &["move"],
                // "put it" addresses the held object; with an entity the
                // same verbs read as move commands
                "put" => &["move", "put"],
                other => {
                    return Err(EngineError::Internal(format!("unknown verb command '{}'", other)))
                }
            };
            for word in std::iter::once(&entry.word).chain(&entry.synonyms) {
                for cat in cats {
                    add(word, cat);
                }
            }
        }

        let mut quantifiers = HashMap::new();
        for entry in &parsed.quantifiers {
            let semantics = match entry.semantics.as_str() {
                "the" => Quantifier::The,
                "any" => Quantifier::Any,
                "all" => Quantifier::All,
                other => {
                    return Err(EngineError::Internal(format!("unknown quantifier '{}'", other)))
                }
            };
            for word in std::iter::once(&entry.word).chain(&entry.synonyms) {
                add(word, "quantifier");
                quantifiers.insert(word.clone(), semantics);
            }
        }

        let mut relations = HashMap::new();
        for entry in &parsed.relations {
            let relation: Relation = entry.relation.parse().map_err(|_| {
                EngineError::Internal(format!("unknown relation '{}'", entry.relation))
            })?;
            let category = if relation == Relation::Between { "between" } else { "relation" };
            for word in std::iter::once(&entry.word).chain(&entry.synonyms) {
                add(word, category);
                relations.insert(word.clone(), relation);
            }
        }

        let mut forms = HashMap::new();
        for entry in &parsed.forms {
            for word in std::iter::once(&entry.word).chain(&entry.synonyms) {
                add(word, "form");
                forms.insert(word.clone(), entry.form);
            }
        }

        let mut sizes = HashMap::new();
        for entry in &parsed.sizes {
            for word in std::iter::once(&entry.word).chain(&entry.synonyms) {
                add(word, "size");
                sizes.insert(word.clone(), entry.size);
            }
        }

        let mut colors = HashMap::new();
        for word in &parsed.colors {
            let color = match word.as_str() {
                "black" => Color::Black,
                "white" => Color::White,
                "red" => Color::Red,
                "green" => Color::Green,
                "blue" => Color::Blue,
                "yellow" => Color::Yellow,
                other => return Err(EngineError::Internal(format!("unknown color '{}'", other))),
            };
            add(word, "color");
            colors.insert(word.clone(), color);
        }

        for word in &parsed.pronouns {
            add(word, "pronoun");
        }
        for word in &parsed.conjunctions {
            add(word, "conjunction");
        }

        let mut phrases: Vec<PhraseGroup> = parsed
            .phrases
            .into_iter()
            .map(|p| PhraseGroup { skeleton: p.skeleton, canonical: p.canonical })
            .collect();
        phrases.sort_by(|a, b| b.skeleton.len().cmp(&a.skeleton.len()));

        Ok(Self { categories, quantifiers, relations, forms, sizes, colors, phrases })
    }

    pub fn quantifier_of(&self, token: &str) -> Option<Quantifier> {
        self.quantifiers.get(token).copied()
    }

    pub fn relation_of(&self, token: &str) -> Option<Relation> {
        self.relations.get(token).copied()
    }

    pub fn form_of(&self, token: &str) -> Option<Form> {
        self.forms.get(token).copied()
    }

    pub fn size_of(&self, token: &str) -> Option<Size> {
        self.sizes.get(token).copied()
    }

    pub fn color_of(&self, token: &str) -> Option<Color> {
        self.colors.get(token).copied()
    }
}

impl TokenClassifier for Lexicon {
    fn classify(&self, token: &str) -> Vec<String> {
        self.categories.get(&token.to_lowercase()).cloned().unwrap_or_default()
    }
}

/// The process-wide lexicon, loaded from the embedded YAML on first use.
pub fn lexicon() -> &'static Lexicon {
    static LEXICON: OnceLock<Lexicon> = OnceLock::new();
    LEXICON.get_or_init(|| {
        Lexicon::from_yaml(EMBEDDED_LEXICON).expect("embedded lexicon should be valid")
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
