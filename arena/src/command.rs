// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat command grammar
//!
//! Commands are case-insensitive and whitespace-delimited; a leading `!`
//! (the usual chat-bot prefix) is tolerated. Anything unrecognized parses to
//! `None` and is ignored so ordinary chatter never triggers a reply.

/// A chat user as reported by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub name: String,
    /// Channel owner or moderator; required for `stop`
    pub privileged: bool,
}

impl User {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            privileged: false,
        }
    }

    pub fn privileged(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            privileged: true,
        }
    }
}

/// A parsed chat command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `challenge [name|open]` — open when no target given
    Challenge { target: Option<String> },
    /// `accept` — take a pending challenge
    Accept,
    /// `yes` — take a pending AI offer
    AcceptAi,
    /// `move <coord>` — the coordinate stays raw until the variant is known
    Move { coord: Option<String> },
    /// `stop` — privileged teardown
    Stop,
}

/// Parse one chat line into a command, `None` for ordinary chatter
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    let line = line.strip_prefix('!').unwrap_or(line);
    let mut parts = line.split_whitespace();
    let head = parts.next()?.to_ascii_lowercase();
    match head.as_str() {
        "challenge" => {
            let target = parts
                .next()
                .filter(|t| !t.eq_ignore_ascii_case("open"))
                .map(str::to_string);
            Some(Command::Challenge { target })
        }
        "accept" => Some(Command::Accept),
        "yes" => Some(Command::AcceptAi),
        "move" => Some(Command::Move {
            coord: parts.next().map(str::to_string),
        }),
        "stop" => Some(Command::Stop),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn challenge_forms() {
        assert_eq!(
            parse_command("challenge"),
            Some(Command::Challenge { target: None })
        );
        assert_eq!(
            parse_command("!challenge OPEN"),
            Some(Command::Challenge { target: None })
        );
        assert_eq!(
            parse_command("Challenge bob"),
            Some(Command::Challenge {
                target: Some("bob".to_string())
            })
        );
    }

    #[test]
    fn move_keeps_the_raw_coordinate() {
        assert_eq!(
            parse_command("move C4"),
            Some(Command::Move {
                coord: Some("C4".to_string())
            })
        );
        assert_eq!(parse_command("!move"), Some(Command::Move { coord: None }));
    }

    #[test]
    fn chatter_is_ignored() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("hello everyone"), None);
        assert_eq!(parse_command("!unknown"), None);
    }

    #[test]
    fn simple_keywords() {
        assert_eq!(parse_command("ACCEPT"), Some(Command::Accept));
        assert_eq!(parse_command("yes"), Some(Command::AcceptAi));
        assert_eq!(parse_command("!stop"), Some(Command::Stop));
    }
}
