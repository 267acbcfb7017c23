//! Interactive dashboard loop.
//!
//! A single thread owns the [`Dashboard`] and reacts to events from an
//! `mpsc` channel:
//!
//! - lines typed on stdin (read by a dedicated thread),
//! - completions from per-request worker threads,
//! - timeouts, used to advance the success indicator.
//!
//! Only the loop thread mutates state, so there are no locks.

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Instant;

use anyhow::Result;
use chrono::Local;
use colored::Colorize;

use crate::dashboard::{Completion, Dashboard};
use crate::predict::Predictor;

use super::paint;

/// A form field addressable from the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Energy,
    Temperature,
    Humidity,
    Timestamp,
}

/// One parsed prompt line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set(Field, String),
    Predict,
    ClearInputs,
    ClearHistory,
    Export(Option<PathBuf>),
    ToggleTheme,
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  energy <value>     set current energy usage
  temp <value>       set temperature (°C)
  hum <value>        set humidity (%)
  ts [text]          set or blank the optional timestamp
  predict            request a next-hour prediction
  clear              blank all inputs
  history clear      empty the history table
  export [dir]       write energy_history.csv (default: current directory)
  theme              toggle light/dark
  show               redraw the dashboard
  help               this text
  quit               exit";

/// Parse a prompt line. Errors are user-facing messages.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((h, r)) => (h, r.trim()),
        None => (line, ""),
    };

    let set = |field: Field| -> Result<Command, String> {
        Ok(Command::Set(field, rest.to_string()))
    };

    match head.to_ascii_lowercase().as_str() {
        "energy" | "e" => set(Field::Energy),
        "temp" | "t" => set(Field::Temperature),
        "hum" | "h" => set(Field::Humidity),
        "ts" => set(Field::Timestamp),
        "" => Ok(Command::Show),
        "predict" | "p" if rest.is_empty() => Ok(Command::Predict),
        "clear" if rest.is_empty() => Ok(Command::ClearInputs),
        "history" if rest.eq_ignore_ascii_case("clear") => Ok(Command::ClearHistory),
        "export" => Ok(Command::Export(
            (!rest.is_empty()).then(|| PathBuf::from(rest)),
        )),
        "theme" => Ok(Command::ToggleTheme),
        "show" => Ok(Command::Show),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        _ => Err(format!("unknown command: {line} (type `help`)")),
    }
}

/// One read from the terminal.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Line(String),
    /// A line that was not valid UTF-8. It is dropped; the loop keeps going.
    Unreadable,
    Eof,
}

enum Event {
    Input(Input),
    Done(Completion),
}

/// Read the next line from `reader` into `buf`.
///
/// Only end of input or a hard read error ends the stream.
fn read_input(reader: &mut impl BufRead, buf: &mut Vec<u8>) -> Input {
    buf.clear();
    loop {
        match reader.read_until(b'\n', buf) {
            Ok(0) if buf.is_empty() => return Input::Eof,
            Ok(_) => break,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                tracing::warn!(error = %e, "stdin read failed");
                return Input::Eof;
            }
        }
    }
    match std::str::from_utf8(buf) {
        Ok(line) => Input::Line(line.trim_end_matches(['\r', '\n']).to_string()),
        Err(e) => {
            tracing::debug!(error = %e, "dropping non-UTF-8 input line");
            Input::Unreadable
        }
    }
}

/// Run the dashboard until `quit` or end of input.
pub fn run(mut dash: Dashboard, predictor: Arc<dyn Predictor>) -> Result<()> {
    let (tx, rx) = mpsc::channel::<Event>();

    let input_tx = tx.clone();
    thread::spawn(move || {
        let mut stdin = io::stdin().lock();
        let mut buf = Vec::new();
        loop {
            let input = read_input(&mut stdin, &mut buf);
            let eof = input == Input::Eof;
            if input_tx.send(Event::Input(input)).is_err() || eof {
                return;
            }
        }
    });

    redraw(&dash, None)?;

    loop {
        let event = match dash.next_deadline() {
            Some(deadline) => {
                match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
                    Ok(ev) => Some(ev),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match rx.recv() {
                Ok(ev) => Some(ev),
                Err(_) => break,
            },
        };

        let mut dirty = dash.tick(Instant::now());
        let mut notice = None;

        match event {
            None => {}
            Some(Event::Input(Input::Eof)) => break,
            Some(Event::Input(Input::Unreadable)) => {
                notice = Some("Input was not valid UTF-8; line ignored.".yellow().to_string());
            }
            Some(Event::Done(completion)) => {
                dash.complete(completion, Instant::now(), Local::now());
                dirty = true;
            }
            Some(Event::Input(Input::Line(line))) => match parse_command(&line) {
                Ok(Command::Quit) => break,
                Ok(Command::Help) => notice = Some(HELP.to_string()),
                Ok(Command::Predict) => {
                    if let Some(request) = dash.begin_predict() {
                        let tx = tx.clone();
                        let predictor = Arc::clone(&predictor);
                        thread::spawn(move || {
                            let _ = tx.send(Event::Done(request.run(predictor.as_ref())));
                        });
                    }
                    dirty = true;
                }
                Ok(cmd) => {
                    notice = apply(&mut dash, cmd);
                    dirty = true;
                }
                Err(msg) => notice = Some(msg.yellow().to_string()),
            },
        }

        if dirty || notice.is_some() {
            redraw(&dash, notice.as_deref())?;
        }
    }

    Ok(())
}

/// Apply a command that needs no worker thread. Returns a one-off notice.
fn apply(dash: &mut Dashboard, command: Command) -> Option<String> {
    match command {
        Command::Set(field, value) => {
            let slot = match field {
                Field::Energy => &mut dash.form.energy,
                Field::Temperature => &mut dash.form.temperature,
                Field::Humidity => &mut dash.form.humidity,
                Field::Timestamp => &mut dash.form.timestamp,
            };
            *slot = value;
            None
        }
        Command::ClearInputs => {
            dash.clear_inputs();
            None
        }
        Command::ClearHistory => {
            dash.clear_history();
            None
        }
        Command::Export(dir) => {
            let dir = dir.unwrap_or_else(|| PathBuf::from("."));
            match dash.export(&dir) {
                Ok(path) => Some(format!("{} Exported to {}", "✓".green().bold(), path.display())),
                Err(e) => {
                    tracing::error!(error = %e, "export failed");
                    Some(format!("{} Export failed: {e}", "✗".red().bold()))
                }
            }
        }
        Command::ToggleTheme => {
            dash.toggle_theme();
            None
        }
        Command::Show => None,
        Command::Predict | Command::Help | Command::Quit => None,
    }
}

fn redraw(dash: &Dashboard, notice: Option<&str>) -> Result<()> {
    let mut out = io::stdout().lock();
    if out.is_terminal() {
        write!(out, "\x1b[2J\x1b[H")?;
    }
    write!(out, "{}", paint::screen(&dash.view()))?;
    if let Some(notice) = notice {
        writeln!(out)?;
        writeln!(out, "{notice}")?;
    }
    write!(out, "\n{} ", ">".bold())?;
    out.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
