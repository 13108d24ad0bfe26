//! # Cosmic Chaos Main Entry Point
//!
//! Builds a session from a seed or a JSON config and drives it from text
//! commands read on stdin, one command per line.

use clap::Parser;
use cosmic_chaos::{
    parse_command, CosmicResult, GameConfig, GameEvent, GameSession, MessageBuffer, PlayerInput,
    TurnPhase,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Messages kept for display.
const MESSAGE_HISTORY: usize = 8;

/// Command line arguments for Cosmic Chaos.
#[derive(Parser, Debug)]
#[command(name = "cosmic-chaos")]
#[command(about = "Turn-based roguelike simulation driven from the terminal")]
#[command(version)]
struct Args {
    /// Random seed for dungeon generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON configuration file; its seed is overridden by --seed
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> CosmicResult<()> {
    let args = Args::parse();

    // RUST_LOG wins over --log-level when set
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(args.log_level.as_str()),
    )
    .format_target(false)
    .init();

    log::info!("Starting Cosmic Chaos v{}", cosmic_chaos::VERSION);

    let mut config = match &args.config {
        Some(path) => GameConfig::from_json_file(path)?,
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.generation.seed = seed;
    }

    let mut session = GameSession::new(config)?;
    let mut messages = MessageBuffer::new(MESSAGE_HISTORY);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    writeln!(stdout, "Welcome to Cosmic Chaos! Type 'esc' to quit.")?;
    print_status(&mut stdout, &session)?;

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let input = match parse_command(&line, session.state().phase) {
            Ok(input) => input,
            Err(err) => {
                writeln!(stdout, "{err}")?;
                continue;
            }
        };

        let Some(intent) = input.clone().into_intent() else {
            if input == PlayerInput::ToggleFullscreen {
                log::debug!("Fullscreen has no meaning in a terminal");
            }
            continue;
        };

        let report = session.process_intent(intent, &mut messages)?;
        for event in &report.events {
            if let GameEvent::Message(message) = event {
                writeln!(stdout, "{}", message.text)?;
            }
        }

        if report.exit {
            break;
        }
        print_status(&mut stdout, &session)?;
    }

    for message in messages.iter() {
        log::debug!("history: {}", message.text);
    }
    let stats = &session.state().statistics;
    log::info!(
        "Session over: {} monsters slain, {} items used, {} steps",
        stats.monsters_slain,
        stats.items_used,
        stats.steps_taken
    );
    Ok(())
}

fn print_status(out: &mut impl Write, session: &GameSession) -> CosmicResult<()> {
    let state = session.state();
    let player = state.player()?;
    let hp = player
        .combatant()
        .map(|c| format!("{}/{}", c.hp, c.max_hp))
        .unwrap_or_default();

    match state.phase {
        TurnPhase::ShowInventory => {
            let items = player.inventory().map(|inv| inv.items.as_slice()).unwrap_or(&[]);
            if items.is_empty() {
                writeln!(out, "Inventory is empty.")?;
            }
            for (slot, item) in items.iter().enumerate() {
                let letter = char::from(b'a' + (slot % 26) as u8);
                writeln!(out, "({letter}) {}", item.name)?;
            }
        }
        TurnPhase::PlayerDead => writeln!(out, "You are dead. Type 'esc' to quit.")?,
        _ => {}
    }

    writeln!(
        out,
        "[turn {}] HP {} at ({}, {})",
        state.turn_number, hp, player.position.x, player.position.y
    )?;
    Ok(())
}
