//! Surface layer: from a raw utterance to typed `Command` trees.
//!
//! Four stages, each its own module:
//!
//! 1. **Normalization** — case fold, punctuation strip, multi-word phrase
//!    canonicalization (`normalize`)
//! 2. **Lexicon** — YAML-driven vocabulary and token classification
//!    (`lexicon`)
//! 3. **Parsing** — Earley chart parser over the command grammar,
//!    preserving structural ambiguity (`earley`, `grammar`)
//! 4. **Extraction** — parse trees to the typed `Command` AST (`command`)

pub mod command;
pub mod earley;
pub mod grammar;
pub mod lexicon;
pub mod normalize;

use std::sync::OnceLock;

use crate::types::{Command, EngineError, Result};

fn command_grammar() -> &'static earley::Grammar {
    static GRAMMAR: OnceLock<earley::Grammar> = OnceLock::new();
    GRAMMAR.get_or_init(grammar::build_command_grammar)
}

/// Parse an utterance into every distinct command it can mean.
///
/// Commands are ordered by parse rank; semantically identical parses are
/// collapsed. An utterance no rule covers is a parsing error.
pub fn parse_utterance(input: &str) -> Result<Vec<Command>> {
    let lex = lexicon::lexicon();
    let tokens = normalize::normalize(input, lex);
    if tokens.is_empty() {
        return Err(EngineError::Parse("nothing to parse".into()));
    }

    let parses = earley::parse(command_grammar(), &tokens, lex);
    if parses.is_empty() {
        return Err(EngineError::Parse(format!("cannot understand \"{}\"", input.trim())));
    }

    let mut commands: Vec<Command> = Vec::new();
    for ranked in &parses {
        let command = command::extract_command(&ranked.tree, lex)?;
        if !commands.contains(&command) {
            commands.push(command);
        }
    }
    Ok(commands)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_utterance_single_command() {
        let commands = parse_utterance("take the white ball").unwrap();
        assert_eq!(commands.len(), 1);
        assert!(matches!(commands[0], Command::Take(_)));
    }

    #[test]
    fn test_parse_utterance_with_synonyms_and_phrases() {
        let commands = parse_utterance("pick up the big yellow box").unwrap();
        assert_eq!(commands.len(), 1);
        assert!(matches!(commands[0], Command::Take(_)));
    }

    #[test]
    fn test_parse_utterance_preserves_ambiguity() {
        let commands = parse_utterance("put a ball in a box on the floor").unwrap();
        assert_eq!(commands.len(), 2);
    }

    #[test]
    fn test_parse_utterance_empty_input() {
        let err = parse_utterance("   ").unwrap_err();
        assert!(matches!(err, EngineError::Parse(_)), "got: {:?}", err);
    }

    #[test]
    fn test_parse_utterance_gibberish() {
        let err = parse_utterance("flip the widget sideways").unwrap_err();
        assert!(matches!(err, EngineError::Parse(_)), "got: {:?}", err);
    }
}
