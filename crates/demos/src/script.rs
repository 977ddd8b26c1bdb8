//! Scripted input playback.
//!
//! A script is plain text with one step per line. Blank lines and lines
//! starting with `#` are skipped.
//!
//! ```text
//! move 100 40        # move the pointer
//! click 100 40       # move, press and release the left button
//! press right        # press a button where the pointer is
//! release right
//! type hello         # type the rest of the line
//! key enter          # a named key
//! wait 250           # run frames for 250ms
//! ```

use std::{result::Result as StdResult, time::Duration};

use tracing::debug;
use trellis::{
    Gui,
    error::{Error, Result},
    event::{Button, KeyCode},
    geom::Point,
};

/// Nominal frame length.
pub const FRAME: Duration = Duration::from_millis(16);

/// One scripted input.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Move the pointer and run a frame.
    Move(Point),
    /// Press a button.
    Press(Button),
    /// Release a button.
    Release(Button),
    /// Move, press and release the left button, then run a frame.
    Click(Point),
    /// Type each character of a string.
    Type(String),
    /// Send a named key.
    Key(KeyCode),
    /// Run frames covering a duration.
    Wait(Duration),
}

/// Parse a script.
pub fn parse(src: &str) -> Result<Vec<Step>> {
    let mut steps = Vec::new();
    for (n, line) in src.lines().enumerate() {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let step = parse_line(line).map_err(|e| Error::Invalid(format!("line {}: {e}", n + 1)))?;
        steps.push(step);
    }
    Ok(steps)
}

/// Parse one non-empty line.
fn parse_line(line: &str) -> StdResult<Step, String> {
    let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();
    match verb {
        "move" => point(rest).map(Step::Move),
        "click" => point(rest).map(Step::Click),
        "press" => button(rest).map(Step::Press),
        "release" => button(rest).map(Step::Release),
        "type" => Ok(Step::Type(rest.to_string())),
        "key" => key(rest).map(Step::Key),
        "wait" => rest
            .parse::<u64>()
            .map(|ms| Step::Wait(Duration::from_millis(ms)))
            .map_err(|_| format!("bad duration {rest:?}")),
        _ => Err(format!("unknown step {verb:?}")),
    }
}

/// Parse `X Y`.
fn point(s: &str) -> StdResult<Point, String> {
    let mut parts = s.split_whitespace().map(str::parse::<f32>);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(x)), Some(Ok(y)), None) => Ok(Point::new(x, y)),
        _ => Err(format!("expected two coordinates, got {s:?}")),
    }
}

/// Parse a button name. An empty name is the left button.
fn button(s: &str) -> StdResult<Button, String> {
    match s {
        "" | "left" => Ok(Button::Left),
        "right" => Ok(Button::Right),
        "middle" => Ok(Button::Middle),
        _ => Err(format!("unknown button {s:?}")),
    }
}

/// Parse a key name.
fn key(s: &str) -> StdResult<KeyCode, String> {
    Ok(match s {
        "backspace" => KeyCode::Backspace,
        "delete" => KeyCode::Delete,
        "enter" => KeyCode::Enter,
        "esc" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        _ => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return Err(format!("unknown key {s:?}")),
            }
        }
    })
}

/// Play steps into a window.
pub fn run(gui: &mut Gui, steps: &[Step]) -> Result<()> {
    for step in steps {
        debug!(?step, "script step");
        match step {
            Step::Move(p) => gui.frame(Some(*p), FRAME)?,
            Step::Press(b) => gui.press(*b)?,
            Step::Release(b) => gui.release(*b)?,
            Step::Click(p) => {
                gui.frame(Some(*p), FRAME)?;
                gui.press(Button::Left)?;
                gui.release(Button::Left)?;
                gui.frame(None, FRAME)?;
            }
            Step::Type(text) => {
                for c in text.chars() {
                    gui.key(c)?;
                }
            }
            Step::Key(k) => gui.key(*k)?,
            Step::Wait(d) => {
                let mut left = *d;
                while !left.is_zero() {
                    let step = left.min(FRAME);
                    gui.frame(None, step)?;
                    left -= step;
                }
            }
        }
    }
    Ok(())
}
