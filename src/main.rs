//! Interactive shell for the blocks world.
//!
//! Loads a world (embedded sample or YAML path), renders it as ASCII
//! columns, and loops: read an utterance, run the pipeline, print the
//! interleaved narration/action plan, and apply the atomic actions so the
//! next command sees the updated world.

use std::path::PathBuf;
use std::time::Duration;

use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor, EditMode};

use gantry::pipeline;
use gantry::planner::DEFAULT_TIMEOUT;
use gantry::ui;
use gantry::world::{WorldState, SAMPLE_WORLDS};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// History file, kept in the user's home directory.
const HISTORY_FILE: &str = ".gantry_history";

fn main() {
    let (mut world, timeout) = match parse_args() {
        Ok(parsed) => parsed,
        Err(message) => {
            eprintln!("{}", ui::error_line(&message));
            eprintln!("{}", usage());
            std::process::exit(1);
        }
    };

    println!("{}", ui::banner("gantry", &format!("v{}", VERSION), "blocks-world shell"));
    println!("{}", ui::dim("Commands like \"put the white ball in a box\". \"quit\" exits."));
    println!();
    print!("{}", world.render());

    let editor_config = Config::builder()
        .edit_mode(EditMode::Emacs)
        .max_history_size(1000)
        .expect("valid history size")
        .auto_add_history(true)
        .build();
    let mut editor =
        DefaultEditor::with_config(editor_config).expect("failed to create line editor");
    let history_path = history_path();
    if let Some(path) = &history_path {
        // missing or corrupt history just starts empty
        let _ = editor.load_history(path);
    }

    let prompt = format!("{} ", ui::bold_cyan("◆"));

    loop {
        match editor.readline(&prompt) {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                match input {
                    "quit" | "exit" => break,
                    "world" => {
                        print!("{}", world.render());
                        continue;
                    }
                    _ => {}
                }

                match pipeline::process(input, &world, timeout) {
                    Ok(plan) => {
                        for step in &plan {
                            match step.as_str() {
                                "p" | "d" | "l" | "r" => {
                                    print!("{} ", ui::action_atom(step));
                                }
                                narration => {
                                    println!();
                                    println!("{}", ui::narration_line(narration));
                                }
                            }
                        }
                        println!();
                        if let Err(e) = world.apply_plan(&plan) {
                            println!("{}", ui::error_line(&e.to_string()));
                        }
                        print!("{}", world.render());
                    }
                    Err(e) => {
                        println!("{}", ui::error_line(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            // Ctrl-D or a closed stdin ends the session
            Err(_) => break,
        }
    }

    if let Some(path) = &history_path {
        let _ = editor.save_history(path);
    }
    println!("{}", ui::dim("bye"));
}

fn history_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(HISTORY_FILE))
}

/// `gantry [world-name | path/to/world.yaml] [--timeout-ms N]`
fn parse_args() -> Result<(WorldState, Duration), String> {
    let mut world: Option<WorldState> = None;
    let mut timeout = DEFAULT_TIMEOUT;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--timeout-ms" => {
                let value = args.next().ok_or("--timeout-ms needs a value")?;
                let ms: u64 =
                    value.parse().map_err(|_| format!("bad timeout '{}'", value))?;
                timeout = Duration::from_millis(ms);
            }
            "--help" | "-h" => return Err("usage".to_string()),
            name => {
                let loaded = if SAMPLE_WORLDS.contains(&name) {
                    WorldState::sample(name)
                } else {
                    WorldState::load_file(name)
                };
                world = Some(loaded.map_err(|e| e.to_string())?);
            }
        }
    }

    let world = match world {
        Some(w) => w,
        None => WorldState::sample("small").map_err(|e| e.to_string())?,
    };
    Ok((world, timeout))
}

fn usage() -> String {
    format!(
        "usage: gantry [{} | path/to/world.yaml] [--timeout-ms N]",
        SAMPLE_WORLDS.join(" | ")
    )
}
