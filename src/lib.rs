//! Lucky Draw: pick prizes from a fixed catalog.
//!
//! A draw is uniform or weighted ("tiered") and with or without
//! replacement ("unique"); a seed makes it reproducible. [`draw_prizes`]
//! is the whole contract, everything else is the command-line shell
//! around it.
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod draw;
pub mod error;
pub mod settings;

pub use catalog::{Catalog, PrizeDef};
pub use draw::{draw_prizes, tally, DrawRequest};
pub use error::{CatalogError, DrawError};

use cli::Command;
use settings::Settings;
use std::io::{self, BufRead, Write};
use std::path::Path;

const EXIT_OK: i32 = 0;
const EXIT_DRAW_FAILED: i32 = 1;
const EXIT_USAGE: i32 = 2;

/// Entry point for the binary. Returns the process exit code.
pub fn run() -> i32 {
    // Load settings or fall back to defaults (log any load error)
    let settings = match settings::load() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!(
                "Failed to load settings, falling back to defaults: {}",
                err
            );
            Settings::default()
        }
    };

    let stdin = io::stdin();
    run_with(
        std::env::args().skip(1),
        &settings,
        &settings::settings_dir(),
        &mut stdin.lock(),
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    )
}

/// Run one command against explicit streams. `config_dir` is where
/// `init-config` writes. Exit codes: 0 success, 1 failed draw or save,
/// 2 bad arguments.
pub fn run_with<I, R, W, E>(
    args: I,
    settings: &Settings,
    config_dir: &Path,
    input: &mut R,
    out: &mut W,
    err: &mut E,
) -> i32
where
    I: IntoIterator<Item = String>,
    R: BufRead,
    W: Write,
    E: Write,
{
    match dispatch(args, settings, config_dir, input, out, err) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Output error: {}", e);
            EXIT_DRAW_FAILED
        }
    }
}

fn dispatch<I, R, W, E>(
    args: I,
    settings: &Settings,
    config_dir: &Path,
    input: &mut R,
    out: &mut W,
    err: &mut E,
) -> io::Result<i32>
where
    I: IntoIterator<Item = String>,
    R: BufRead,
    W: Write,
    E: Write,
{
    let command = match cli::parse_args(args, settings) {
        Ok(command) => command,
        Err(e) => {
            writeln!(err, "{}\n\n{}", e, cli::USAGE)?;
            return Ok(EXIT_USAGE);
        }
    };

    let catalog = match settings.catalog() {
        Ok(catalog) => catalog,
        Err(e) => {
            writeln!(err, "{}; using the bundled prizes", e)?;
            Catalog::bundled().clone()
        }
    };

    let code = match command {
        Command::Help => {
            writeln!(out, "{}", cli::USAGE)?;
            EXIT_OK
        }
        Command::Odds { tiered } => {
            write!(out, "{}", catalog.odds_table(tiered))?;
            EXIT_OK
        }
        Command::InitConfig => {
            // Spell out the prize list so it can be edited in place
            let mut to_save = settings.clone();
            to_save.prizes.get_or_insert_with(|| catalog.defs());
            match settings::save_to(config_dir, &to_save) {
                Ok(path) => {
                    writeln!(out, "Settings written to {}", path.display())?;
                    EXIT_OK
                }
                Err(e) => {
                    writeln!(err, "Failed to save settings: {}", e)?;
                    EXIT_DRAW_FAILED
                }
            }
        }
        Command::Draw {
            form,
            json: true,
            ..
        } => match commands::draw_json(&form, settings, &catalog) {
            Ok(value) => {
                writeln!(out, "{value:#}")?;
                EXIT_OK
            }
            Err(e) => {
                writeln!(err, "Error: {e}")?;
                EXIT_DRAW_FAILED
            }
        },
        Command::Draw { form, summary, .. } => {
            match commands::run_draw(&form, settings, &catalog) {
                Ok(prizes) => {
                    writeln!(out, "{}", commands::render_prizes(&prizes))?;
                    if summary {
                        writeln!(out, "\n{}", commands::render_tally(&prizes, &catalog))?;
                    }
                    EXIT_OK
                }
                Err(e) => {
                    writeln!(err, "Error: {e}")?;
                    EXIT_DRAW_FAILED
                }
            }
        }
        Command::Interactive => match cli::interactive(input, out, settings, &catalog) {
            Ok(true) => EXIT_OK,
            Ok(false) => EXIT_DRAW_FAILED,
            Err(e) => {
                writeln!(err, "Form I/O error: {}", e)?;
                EXIT_DRAW_FAILED
            }
        },
    };
    Ok(code)
}
