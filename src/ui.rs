//! Terminal UI primitives — colors and formatting helpers for the shell.
//!
//! Zero external dependencies. Uses raw ANSI escape codes and respects the
//! `NO_COLOR` environment variable (https://no-color.org/).

use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Color support detection
// ---------------------------------------------------------------------------

/// Returns `true` if color output is enabled.
/// Disabled when `NO_COLOR` is set (any value) or `TERM=dumb`.
pub fn color_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| {
        if std::env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if let Ok(term) = std::env::var("TERM") {
            if term == "dumb" {
                return false;
            }
        }
        true
    })
}

// ---------------------------------------------------------------------------
// ANSI escape helpers
// ---------------------------------------------------------------------------

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

const FG_RED: &str = "\x1b[31m";
const FG_CYAN: &str = "\x1b[36m";
const FG_WHITE: &str = "\x1b[37m";

/// Apply an ANSI style to text. Returns plain text if color is disabled.
fn styled(codes: &[&str], text: &str) -> String {
    if !color_enabled() || codes.is_empty() {
        return text.to_string();
    }
    let prefix: String = codes.iter().copied().collect();
    format!("{}{}{}", prefix, text, RESET)
}

// ---------------------------------------------------------------------------
// Public style functions
// ---------------------------------------------------------------------------

pub fn dim(text: &str) -> String {
    styled(&[DIM], text)
}

pub fn red(text: &str) -> String {
    styled(&[FG_RED], text)
}

pub fn cyan(text: &str) -> String {
    styled(&[FG_CYAN], text)
}

pub fn bold_white(text: &str) -> String {
    styled(&[BOLD, FG_WHITE], text)
}

pub fn bold_cyan(text: &str) -> String {
    styled(&[BOLD, FG_CYAN], text)
}

// ---------------------------------------------------------------------------
// Formatting primitives
// ---------------------------------------------------------------------------

/// Compact startup banner: `▰▰▰ gantry v0.4.0 — blocks-world shell`.
pub fn banner(name: &str, version: &str, subtitle: &str) -> String {
    format!("{} {} {} {} {}", bold_cyan("▰▰▰"), bold_white(name), dim(version), dim("—"), dim(subtitle))
}

/// Render an error line.
pub fn error_line(message: &str) -> String {
    format!("{} {}", red("✗"), message)
}

/// Render a narration line from a plan.
pub fn narration_line(message: &str) -> String {
    format!("{} {}", cyan("▸"), message)
}

/// Render an atomic action character.
pub fn action_atom(action: &str) -> String {
    dim(&format!("[{}]", action))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
