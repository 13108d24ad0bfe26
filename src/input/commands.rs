//! # Command Parsing
//!
//! Text commands for headless play, decoded the same way a keyboard front end
//! decodes keys: what a key means depends on the current phase.

use crate::{CosmicError, CosmicResult, Direction, PlayerInput, Position, TurnPhase};

/// Parses one line of text into a [`PlayerInput`].
///
/// Recognised commands:
///
/// | input                   | meaning                         |
/// |-------------------------|---------------------------------|
/// | `h j k l y u b n`       | move one tile                   |
/// | `move DX DY`            | step by an offset in -1..=1     |
/// | `g`                     | pick up                         |
/// | `i`                     | open the inventory              |
/// | `use N`                 | use inventory slot `N`          |
/// | `esc`, `quit`           | close the inventory or quit     |
/// | `fullscreen`            | toggle fullscreen               |
///
/// While the inventory is open a single letter `a`..`z` selects a slot
/// instead. After death only `i`, `use`, `esc` and `fullscreen` are
/// understood.
///
/// # Examples
///
/// ```
/// use cosmic_chaos::{parse_command, PlayerInput, Position, TurnPhase};
///
/// let input = parse_command("k", TurnPhase::PlayersTurn).unwrap();
/// assert_eq!(input, PlayerInput::Move(Position::new(0, -1)));
///
/// let input = parse_command("b", TurnPhase::ShowInventory).unwrap();
/// assert_eq!(input, PlayerInput::SelectItem(1));
/// ```
pub fn parse_command(line: &str, phase: TurnPhase) -> CosmicResult<PlayerInput> {
    let mut words = line.split_whitespace();
    let command = words
        .next()
        .ok_or_else(|| CosmicError::InvalidAction("empty command".to_string()))?
        .to_ascii_lowercase();
    let args: Vec<&str> = words.collect();

    if let Some(input) = system_command(&command, &args)? {
        return Ok(input);
    }

    match phase {
        TurnPhase::PlayersTurn | TurnPhase::EnemyTurn => player_turn_command(&command, &args),
        TurnPhase::ShowInventory => inventory_command(&command),
        TurnPhase::PlayerDead => match command.as_str() {
            "i" => Ok(PlayerInput::ShowInventory),
            _ => Err(unknown(&command)),
        },
    }
}

fn system_command(command: &str, args: &[&str]) -> CosmicResult<Option<PlayerInput>> {
    let input = match command {
        "esc" | "escape" | "quit" => PlayerInput::Cancel,
        "fullscreen" => PlayerInput::ToggleFullscreen,
        "use" => PlayerInput::SelectItem(parse_number(args.first().copied(), "use")?),
        _ => return Ok(None),
    };
    Ok(Some(input))
}

fn player_turn_command(command: &str, args: &[&str]) -> CosmicResult<PlayerInput> {
    if let Some(direction) = vi_direction(command) {
        return Ok(PlayerInput::Move(direction.to_delta()));
    }
    match command {
        "g" => Ok(PlayerInput::PickUp),
        "i" => Ok(PlayerInput::ShowInventory),
        "move" => {
            let dx: i32 = parse_number(args.first().copied(), "move")?;
            let dy: i32 = parse_number(args.get(1).copied(), "move")?;
            if !is_step(dx) || !is_step(dy) {
                return Err(CosmicError::InvalidAction(format!(
                    "'move {dx} {dy}' must step at most one tile per axis"
                )));
            }
            Ok(PlayerInput::Move(Position::new(dx, dy)))
        }
        _ => Err(unknown(command)),
    }
}

fn inventory_command(command: &str) -> CosmicResult<PlayerInput> {
    let mut chars = command.chars();
    match (chars.next(), chars.next()) {
        (Some(letter @ 'a'..='z'), None) => Ok(PlayerInput::SelectItem(letter as usize - 'a' as usize)),
        _ => Err(unknown(command)),
    }
}

/// Direction bound to a vi-style key.
pub fn vi_direction(key: &str) -> Option<Direction> {
    match key {
        "k" => Some(Direction::North),
        "j" => Some(Direction::South),
        "h" => Some(Direction::West),
        "l" => Some(Direction::East),
        "y" => Some(Direction::Northwest),
        "u" => Some(Direction::Northeast),
        "b" => Some(Direction::Southwest),
        "n" => Some(Direction::Southeast),
        _ => None,
    }
}

fn parse_number<T: std::str::FromStr>(arg: Option<&str>, command: &str) -> CosmicResult<T> {
    arg.and_then(|value| value.parse().ok())
        .ok_or_else(|| CosmicError::InvalidAction(format!("'{command}' needs a numeric argument")))
}

fn is_step(delta: i32) -> bool {
    (-1..=1).contains(&delta)
}

fn unknown(command: &str) -> CosmicError {
    CosmicError::InvalidAction(format!("unknown command '{command}'"))
}
