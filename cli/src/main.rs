// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gridduel CLI - headless chat driver
//!
//! This binary stands in for the real chat transport so the arena can be
//! exercised without one. It reads `name: text` lines from stdin (append `*`
//! to the name for moderator rights, e.g. `alice*: !stop`), forwards them to
//! the arena, and prints every outbound chat reply. Overlay snapshots land
//! in a local JSON file, the way the overlay web server expects them.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::AsyncBufReadExt;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use gridduel_arena::{config, ArenaEvent, FileOverlay, GameArena, User};

/// Command-line arguments
#[derive(Parser, Debug)]
#[clap(name = "gridduel-cli", about = "Gridduel headless chat driver", version)]
struct Args {
    /// Channel name this arena serves
    #[clap(short, long, default_value = "local")]
    channel: String,

    /// Where to write overlay snapshots
    #[clap(long, default_value = "overlay/data.json")]
    overlay: PathBuf,

    /// Config file path (defaults to the platform config directory)
    #[clap(long)]
    config: Option<PathBuf>,

    /// Names treated as moderators, in addition to the `name*` marker
    #[clap(long)]
    moderator: Vec<String>,

    /// Enable debug logging
    #[clap(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => config::config_path()?,
    };
    let cfg = config::load_config(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let overlay = Arc::new(FileOverlay::new(&args.overlay));
    let mut overlay_events = overlay.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = overlay_events.recv().await {
            tracing::debug!(game = %event.game, event = %event.event, "overlay event");
        }
    });

    let arena = GameArena::new(&args.channel, cfg, overlay);
    let mut chat = arena.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = chat.recv().await {
            let ArenaEvent::Chat(text) = event;
            println!("[bot] {text}");
        }
    });

    tracing::info!(channel = %args.channel, "arena ready, type `name: !challenge open` to play");

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                tracing::info!("interrupted, shutting down");
                break;
            }
            line = lines.next_line() => {
                match line.context("Failed to read stdin")? {
                    None => break,
                    Some(line) => {
                        let Some((user, text)) = split_chat_line(&line, &args.moderator) else {
                            continue;
                        };
                        arena.handle_chat(&user, text).await;
                    }
                }
            }
        }
    }

    Ok(())
}

/// Split a `name: text` line into the speaking user and their message.
/// A `*` directly after the name grants moderator rights.
fn split_chat_line<'a>(line: &'a str, moderators: &[String]) -> Option<(User, &'a str)> {
    let (name, text) = line.split_once(':')?;
    let name = name.trim();
    let (name, starred) = match name.strip_suffix('*') {
        Some(stripped) => (stripped.trim_end(), true),
        None => (name, false),
    };
    if name.is_empty() {
        return None;
    }
    let privileged = starred
        || moderators
            .iter()
            .any(|m| m.eq_ignore_ascii_case(name));
    Some((
        User {
            name: name.to_string(),
            privileged,
        },
        text.trim(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_line() {
        let (user, text) = split_chat_line("alice: move C4", &[]).unwrap();
        assert_eq!(user.name, "alice");
        assert!(!user.privileged);
        assert_eq!(text, "move C4");
    }

    #[test]
    fn starred_name_is_privileged() {
        let (user, text) = split_chat_line("mod*: !stop", &[]).unwrap();
        assert_eq!(user.name, "mod");
        assert!(user.privileged);
        assert_eq!(text, "!stop");
    }

    #[test]
    fn listed_moderators_are_privileged() {
        let mods = vec!["Streamer".to_string()];
        let (user, _) = split_chat_line("streamer: !stop", &mods).unwrap();
        assert!(user.privileged);
    }

    #[test]
    fn chatter_without_a_name_is_dropped() {
        assert!(split_chat_line("no separator here", &[]).is_none());
        assert!(split_chat_line(": hello", &[]).is_none());
    }
}
