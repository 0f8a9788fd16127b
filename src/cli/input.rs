//! Text command parsing for interactive play.
//!
//! ```text
//! buy <soldier|tank> <count> <city>
//! move <soldiers> <tanks> <from> to <to>
//! advance <soldiers> <tanks> <from> to <to>
//! end
//! map | help | quit
//! ```
//!
//! City names may contain spaces ("Summerset Isles") and are matched
//! case-insensitively against the names on the map.

use connect_six::{Command, UnitKind};
use thiserror::Error;

/// One line of player input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Input {
    /// A game command for the engine.
    Command(Command),
    /// Print the map again.
    Map,
    /// Print the command summary.
    Help,
    /// Stop playing.
    Quit,
}

/// Why a line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum ParseError {
    /// Blank line.
    #[error("empty input")]
    Empty,
    /// First word is not a command.
    #[error("unknown command {0:?}; type help")]
    UnknownVerb(String),
    /// Unit kind not soldier or tank.
    #[error("unknown unit {0:?}; expected soldier or tank")]
    UnknownUnit(String),
    /// A count that is not a non-negative integer.
    #[error("{0:?} is not a valid count")]
    BadCount(String),
    /// Wrong shape for the verb.
    #[error("usage: {0}")]
    Usage(&'static str),
}

/// Summary printed for `help`.
pub(crate) const HELP: &str = "\
commands:
  buy <soldier|tank> <count> <city>          buy units (soldier 20, tank 50)
  move <soldiers> <tanks> <from> to <to>     shift units between your cities
  advance <soldiers> <tanks> <from> to <to>  push into an adjacent city
  end                                        finish your turn
  map                                        show the map
  quit                                       stop (the game can be saved)";

const BUY_USAGE: &str = "buy <soldier|tank> <count> <city>";
const MOVE_USAGE: &str = "move <soldiers> <tanks> <from> to <to>";
const ADVANCE_USAGE: &str = "advance <soldiers> <tanks> <from> to <to>";

/// Parse one line. `city_names` resolves case-insensitive names to the
/// spelling on the map; unknown names pass through for the engine to reject.
pub(crate) fn parse_line(line: &str, city_names: &[String]) -> Result<Input, ParseError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((verb, rest)) = words.split_first() else {
        return Err(ParseError::Empty);
    };

    match verb.to_ascii_lowercase().as_str() {
        "buy" | "purchase" => {
            let [unit, count, city @ ..] = rest else {
                return Err(ParseError::Usage(BUY_USAGE));
            };
            if city.is_empty() {
                return Err(ParseError::Usage(BUY_USAGE));
            }
            Ok(Input::Command(Command::Purchase {
                unit: parse_unit(unit)?,
                count: parse_count(count)?,
                city: resolve_city(&city.join(" "), city_names),
            }))
        }
        "move" | "advance" => {
            let usage = if verb.eq_ignore_ascii_case("move") {
                MOVE_USAGE
            } else {
                ADVANCE_USAGE
            };
            let [soldiers, tanks, route @ ..] = rest else {
                return Err(ParseError::Usage(usage));
            };
            let soldiers = parse_count(soldiers)?;
            let tanks = parse_count(tanks)?;
            let (from, to) = split_route(route).ok_or(ParseError::Usage(usage))?;
            let from = resolve_city(&from, city_names);
            let to = resolve_city(&to, city_names);
            Ok(Input::Command(if usage == MOVE_USAGE {
                Command::Move {
                    from,
                    to,
                    soldiers,
                    tanks,
                }
            } else {
                Command::Advance {
                    from,
                    to,
                    soldiers,
                    tanks,
                }
            }))
        }
        "end" | "done" => Ok(Input::Command(Command::EndTurn)),
        "map" | "status" => Ok(Input::Map),
        "help" | "?" => Ok(Input::Help),
        "quit" | "exit" => Ok(Input::Quit),
        other => Err(ParseError::UnknownVerb(other.to_string())),
    }
}

fn parse_unit(word: &str) -> Result<UnitKind, ParseError> {
    match word.to_ascii_lowercase().as_str() {
        "soldier" | "soldiers" | "s" => Ok(UnitKind::Soldier),
        "tank" | "tanks" | "t" => Ok(UnitKind::Tank),
        _ => Err(ParseError::UnknownUnit(word.to_string())),
    }
}

fn parse_count(word: &str) -> Result<u32, ParseError> {
    word.parse().map_err(|_| ParseError::BadCount(word.to_string()))
}

/// Split `<from words> to <to words>` at the first standalone `to`.
fn split_route(words: &[&str]) -> Option<(String, String)> {
    let at = words.iter().position(|w| w.eq_ignore_ascii_case("to"))?;
    let (from, to) = (&words[..at], &words[at + 1..]);
    if from.is_empty() || to.is_empty() {
        return None;
    }
    Some((from.join(" "), to.join(" ")))
}

fn resolve_city(name: &str, city_names: &[String]) -> String {
    city_names
        .iter()
        .find(|known| known.eq_ignore_ascii_case(name))
        .cloned()
        .unwrap_or_else(|| name.to_string())
}
