//! Command parsing

use counter_core::Snowflake;

/// Channel named in a command argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelArg {
    /// A `<#id>` mention or a raw ID
    Id(Snowflake),
    /// Anything else, looked up among the guild's channels by name
    Name(String),
}

impl ChannelArg {
    fn parse(arg: &str) -> Self {
        match Snowflake::parse_channel_mention(arg) {
            Ok(id) => Self::Id(id),
            Err(_) => Self::Name(arg.strip_prefix('#').unwrap_or(arg).to_string()),
        }
    }
}

/// A recognised command with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Turn the channel into a counting channel
    Start { slowmode: bool },
    /// Stop counting in the channel
    Stop,
    /// Show the scoreboard of `target`, or of the invoking channel
    Leaderboard { target: Option<ChannelArg> },
}

impl Command {
    /// Canonical command name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Start { .. } => "start",
            Self::Stop => "stop",
            Self::Leaderboard { .. } => "leaderboard",
        }
    }
}

/// Result of looking at a message as a potential command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// No prefix, or nothing after it
    NotCommand,
    /// Prefixed word that names no command
    Unknown(String),
    /// Registered command with an argument it cannot use
    Invalid { command: &'static str, reason: String },
    Command(Command),
}

impl ParseOutcome {
    /// Whether the message invoked a registered command
    #[must_use]
    pub fn is_registered(&self) -> bool {
        matches!(self, Self::Command(_) | Self::Invalid { .. })
    }
}

/// Parse `content` as a command using `prefix`
///
/// The prefix must match exactly and be followed directly by the command
/// name. Extra arguments are ignored.
#[must_use]
pub fn parse_command(prefix: &str, content: &str) -> ParseOutcome {
    let Some(rest) = content.strip_prefix(prefix) else {
        return ParseOutcome::NotCommand;
    };
    if rest.starts_with(char::is_whitespace) {
        return ParseOutcome::NotCommand;
    }

    let mut words = rest.split_whitespace();
    let Some(name) = words.next() else {
        return ParseOutcome::NotCommand;
    };
    let argument = words.next().map(unquote);

    match name.to_lowercase().as_str() {
        "start" => match argument.map(parse_bool) {
            None => ParseOutcome::Command(Command::Start { slowmode: true }),
            Some(Some(slowmode)) => ParseOutcome::Command(Command::Start { slowmode }),
            Some(None) => ParseOutcome::Invalid {
                command: "start",
                reason: format!("expected a boolean, got {:?}", argument.unwrap_or_default()),
            },
        },
        "stop" => ParseOutcome::Command(Command::Stop),
        "leaderboard" | "lb" | "sc" => ParseOutcome::Command(Command::Leaderboard {
            target: argument.map(ChannelArg::parse),
        }),
        _ => ParseOutcome::Unknown(name.to_string()),
    }
}

/// Parse a boolean argument
///
/// Accepts yes/y/true/t/1/enable/on and no/n/false/f/0/disable/off in any case.
#[must_use]
pub fn parse_bool(arg: &str) -> Option<bool> {
    match arg.to_lowercase().as_str() {
        "yes" | "y" | "true" | "t" | "1" | "enable" | "on" => Some(true),
        "no" | "n" | "false" | "f" | "0" | "disable" | "off" => Some(false),
        _ => None,
    }
}

fn unquote(arg: &str) -> &str {
    arg.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(arg)
}
