//! `sypad` — a small syntax-highlighting code pad for the terminal.
//!
//! ## Reading guide (high level architecture)
//! - **`main()` / `run()`**: sets up the terminal and runs the input/render loop.
//! - **`terminal::TerminalGuard`**: raw mode + alternate screen, restored on exit.
//! - **`buffer::Buffer`**: the document model (lines of text) and low-level edits.
//! - **`editor::Editor`**: application state, key handling, rendering, prompts,
//!   undo/redo. Thin adapter over the pure editing modules:
//! - **`indent` / `edit` / `highlight` / `search` / `calltips`**: the editing
//!   rules themselves: indentation, bracket pairing, syntax spans,
//!   find/replace scanning, and the builtin calltip registry.
//! - **`config` / `theme`**: persisted settings and the two color palettes.

mod buffer;
mod calltips;
mod config;
mod edit;
mod editor;
mod highlight;
mod indent;
mod search;
mod terminal;
mod theme;
mod types;
mod utils;

use anyhow::Result;
use config::Settings;
use crossterm::event::{self, Event, KeyEventKind};
use editor::Editor;
use std::io;
use std::time::Duration;
use terminal::TerminalGuard;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

/// Parse arguments, set up the terminal, and loop: render → read input →
/// update state.
fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let mut file_to_open = None;
    if args.len() > 1 {
        match args[1].as_str() {
            "-h" | "--help" => {
                println!("sypad — a small syntax-highlighting code pad");
                println!();
                println!("USAGE:");
                println!("    sypad [FILE]         Open a file (created on first save)");
                println!("    sypad -h, --help     Show this help message");
                println!("    sypad -v, --version  Show version information");
                println!();
                println!("KEYBINDINGS:");
                println!("    Ctrl+S               Save   (Ctrl+O open, Ctrl+Q quit)");
                println!("    Ctrl+F / F3          Find / repeat find");
                println!("    Ctrl+H               Replace (interactive)");
                println!("    Ctrl+G               Go to line");
                println!("    Ctrl+Space           Calltip for the name before the cursor");
                println!("    Tab / Shift+Tab      Indent / unindent");
                println!("    Alt+T / Alt+K / Alt+W  Theme / calltips / word wrap");
                return Ok(());
            }
            "-v" | "--version" => {
                println!("sypad v{}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            flag if flag.starts_with('-') => {
                eprintln!("Error: Unknown flag '{}'", flag);
                eprintln!("Try 'sypad --help' for more information.");
                std::process::exit(1);
            }
            path => {
                file_to_open = Some(std::path::PathBuf::from(path));
            }
        }
    }

    // Settings load silently falls back to defaults on any problem.
    let settings = Settings::load();

    let mut stdout = io::stdout();
    let _term = TerminalGuard::new(&mut stdout)?;

    let mut editor = Editor::new(file_to_open, settings)?;

    loop {
        editor.render(&mut stdout)?;

        // Poll so time-based UI (status messages, calltip auto-hide) can
        // expire without input.
        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if editor.handle_key(key)? {
                        break;
                    }
                }
                Event::Resize(_, _) => {
                    editor.on_resize();
                }
                _ => {}
            }
        } else {
            editor.tick();
        }
    }

    Ok(())
}
