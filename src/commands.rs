// Input line parsing
//
// Lines typed into the input box are either a channel selection (`/3`,
// `/3b hello`), a slash command (`/l`, `/q`, `/h`), or plain text for the
// current channel.

use regex::Regex;
use std::sync::OnceLock;

/// Slash commands understood by the input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/l` - list channels in the debug pane
    ListChannels,
    /// `/q` - quit
    Quit,
    /// `/h` or anything unrecognized - show help
    Help,
}

/// Parsed form of one submitted input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Switch the send target; `text` (possibly empty) is sent there afterwards
    SelectChannel {
        channel: String,
        thread: Option<String>,
        text: String,
    },
    Command(Command),
    /// Plain message text for the current channel
    Text(String),
    /// Nothing but whitespace
    Empty,
}

fn channel_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*/(\d+)([a-z]*)").expect("channel selection pattern is valid")
    })
}

fn command_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\s*/(\w+)").expect("command pattern is valid"))
}

/// Classify one line of user input
pub fn parse_input(line: &str) -> Input {
    if let Some(caps) = channel_pattern().captures(line) {
        let thread = caps.get(2).map(|m| m.as_str()).filter(|t| !t.is_empty());
        let rest = &line[caps.get(0).map_or(0, |m| m.end())..];
        return Input::SelectChannel {
            channel: caps[1].to_string(),
            thread: thread.map(str::to_string),
            text: rest.trim().to_string(),
        };
    }

    if let Some(caps) = command_pattern().captures(line) {
        let command = match &caps[1] {
            "l" => Command::ListChannels,
            "q" => Command::Quit,
            _ => Command::Help,
        };
        return Input::Command(command);
    }

    if line.trim().is_empty() {
        Input::Empty
    } else {
        Input::Text(line.to_string())
    }
}
