//! Command-line front end: argument parsing and the interactive draw form.
use crate::catalog::Catalog;
use crate::commands::{self, DrawForm};
use crate::settings::Settings;
use std::io::{self, BufRead, Write};

pub const USAGE: &str = "\
Usage:
  lucky-draw                          interactive draw form
  lucky-draw [draw] [options]         draw prizes
  lucky-draw odds [--uniform]         show the chance of each prize
  lucky-draw init-config              write the settings file
  lucky-draw help

Draw options:
  -n, --quantity N   number of prizes (default 1)
  -u, --unique       no duplicate prizes
      --uniform      every prize equally likely
      --tiered       weighted draw (default)
  -s, --seed TEXT    reproducible draw; non-numeric text means no seed
      --json         print the result as JSON
      --summary      append a per-prize tally";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Interactive,
    Draw {
        form: DrawForm,
        json: bool,
        summary: bool,
    },
    Odds {
        tiered: bool,
    },
    InitConfig,
    Help,
}

/// Parse arguments (without the program name). Form defaults come from
/// `settings`.
pub fn parse_args<I>(args: I, settings: &Settings) -> Result<Command, String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter().peekable();

    let Some(first) = args.peek().cloned() else {
        return Ok(Command::Interactive);
    };

    match first.as_str() {
        "help" | "-h" | "--help" => Ok(Command::Help),
        "init-config" => {
            args.next();
            expect_end(args)?;
            Ok(Command::InitConfig)
        }
        "odds" => {
            args.next();
            let mut tiered = settings.tiered;
            for arg in args {
                match arg.as_str() {
                    "--uniform" => tiered = false,
                    "--tiered" => tiered = true,
                    other => return Err(format!("unknown option for odds: {other}")),
                }
            }
            Ok(Command::Odds { tiered })
        }
        _ => {
            if first == "draw" {
                args.next();
            }
            let mut form = DrawForm::from_settings(settings);
            let mut json = false;
            let mut summary = settings.show_summary;
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "-n" | "--quantity" => {
                        form.quantity = args
                            .next()
                            .ok_or_else(|| format!("{arg} needs a value"))?;
                    }
                    "-u" | "--unique" => form.unique = true,
                    "--uniform" => form.tiered = false,
                    "--tiered" => form.tiered = true,
                    "-s" | "--seed" => {
                        form.seed = args.next().ok_or_else(|| format!("{arg} needs a value"))?;
                    }
                    "--json" => json = true,
                    "--summary" => summary = true,
                    other => return Err(format!("unknown option: {other}")),
                }
            }
            Ok(Command::Draw {
                form,
                json,
                summary,
            })
        }
    }
}

fn expect_end(mut args: impl Iterator<Item = String>) -> Result<(), String> {
    match args.next() {
        Some(extra) => Err(format!("unexpected argument: {extra}")),
        None => Ok(()),
    }
}

/// Ask for each form field on `output`, read answers from `input`, then
/// print the numbered prizes or the error. Returns whether the draw
/// succeeded; an exhausted input counts as blank answers.
pub fn interactive<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    settings: &Settings,
    catalog: &Catalog,
) -> io::Result<bool> {
    writeln!(output, "Lucky Draw Simulator")?;

    let mut form = DrawForm::from_settings(settings);
    let quantity = prompt(
        input,
        output,
        &format!("Quantity of prize (1-{}) [1]: ", settings.max_quantity),
    )?;
    if !quantity.is_empty() {
        form.quantity = quantity;
    }
    form.unique = prompt_toggle(
        input,
        output,
        "Draw unique prizes (no duplicates)?",
        form.unique,
    )?;
    form.tiered = prompt_toggle(input, output, "Use tiered (weighted) draw?", form.tiered)?;
    form.seed = prompt(input, output, "Optional seed for reproducible results: ")?;

    match commands::run_draw(&form, settings, catalog) {
        Ok(prizes) => {
            writeln!(output, "Your randomized prizes:")?;
            writeln!(output, "{}", commands::render_prizes(&prizes))?;
            if settings.show_summary {
                writeln!(output, "{}", commands::render_tally(&prizes, catalog))?;
            }
            Ok(true)
        }
        Err(e) => {
            writeln!(output, "Error: {e}")?;
            Ok(false)
        }
    }
}

fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> io::Result<String> {
    write!(output, "{label}")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
}

fn prompt_toggle<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
    default: bool,
) -> io::Result<bool> {
    let hint = if default { "[Y/n]" } else { "[y/N]" };
    let answer = prompt(input, output, &format!("{label} {hint} "))?;
    Ok(match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => true,
        "n" | "no" => false,
        _ => default,
    })
}
