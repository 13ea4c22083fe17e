//! Utterance normalization: case fold, punctuation strip, and multi-word
//! phrase canonicalization ("on top of" → `ontop`, "pick up" → `take`).
//!
//! Phrases are matched greedily, longest skeleton first, against the
//! token stream; a phrase with an empty canonical token is dropped
//! entirely (relative-clause glue like "that is").

use crate::nl::lexicon::Lexicon;

/// Normalize an utterance into parser-ready tokens.
pub fn normalize(input: &str, lexicon: &Lexicon) -> Vec<String> {
    let tokens = tokenize(input);
    apply_phrases(&tokens, lexicon)
}

/// Lowercase, strip punctuation, split on whitespace.
fn tokenize(input: &str) -> Vec<String> {
    input
        .to_lowercase()
        .split_whitespace()
        .map(|word| word.chars().filter(|c| c.is_alphanumeric()).collect::<String>())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Replace phrase skeletons with their canonical tokens.
fn apply_phrases(tokens: &[String], lexicon: &Lexicon) -> Vec<String> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    'outer: while i < tokens.len() {
        for phrase in &lexicon.phrases {
            let n = phrase.skeleton.len();
            if i + n <= tokens.len() && tokens[i..i + n] == phrase.skeleton[..] {
                if !phrase.canonical.is_empty() {
                    out.push(phrase.canonical.clone());
                }
                i += n;
                continue 'outer;
            }
        }
        out.push(tokens[i].clone());
        i += 1;
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nl::lexicon::lexicon;

    fn norm(input: &str) -> Vec<String> {
        normalize(input, lexicon())
    }

    #[test]
    fn test_case_fold_and_punctuation() {
        assert_eq!(norm("Take the White Ball!"), vec!["take", "the", "white", "ball"]);
        assert_eq!(norm("take   the ball."), vec!["take", "the", "ball"]);
    }

    #[test]
    fn test_phrase_canonicalization() {
        assert_eq!(norm("pick up the ball"), vec!["take", "the", "ball"]);
        assert_eq!(
            norm("put the ball on top of the table"),
            vec!["put", "the", "ball", "ontop", "the", "table"]
        );
        assert_eq!(
            norm("put the ball left of the box"),
            vec!["put", "the", "ball", "leftof", "the", "box"]
        );
    }

    #[test]
    fn test_longest_phrase_wins() {
        assert_eq!(
            norm("move the ball to the left of the box"),
            vec!["move", "the", "ball", "leftof", "the", "box"]
        );
    }

    #[test]
    fn test_relative_clause_glue_dropped() {
        assert_eq!(
            norm("take the ball that is in the box"),
            vec!["take", "the", "ball", "in", "the", "box"]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(norm("").is_empty());
        assert!(norm("  !?  ").is_empty());
    }
}
