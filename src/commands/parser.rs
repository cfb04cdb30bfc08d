use crate::error::{WelcomerError, WelcomerResult};
use crate::models::Mode;

/// Root literal of the command tree; optional on input
pub const COMMAND_PREFIX: &str = "/welcomer";

pub const USAGE: &str = "Usage: /welcomer <toggle | selfgreet toggle | status | ignore <player> | \
unignore <player> | mode <default|constantiam|hypersafe> | config <reload|reloadself|add <message>|addself <message>> | info>";

/// A parsed `/welcomer` command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Toggle,
    SelfGreetToggle,
    Status,
    Ignore(String),
    Unignore(String),
    SetMode(Mode),
    ReloadMessages,
    ReloadSelfMessages,
    AddMessage(String),
    AddSelfMessage(String),
    Info,
}

impl Command {
    /// Parse one command line.
    ///
    /// Literals are matched case-insensitively. Player names are a single
    /// word or a double-quoted string; messages take the rest of the line.
    pub fn parse(input: &str) -> WelcomerResult<Self> {
        let input = input.trim();
        let input = strip_prefix_ci(input, COMMAND_PREFIX).unwrap_or(input).trim_start();

        let (head, rest) = split_word(input);
        match head.to_ascii_lowercase().as_str() {
            "toggle" => expect_end(rest, Command::Toggle),
            "selfgreet" => {
                let (sub, rest) = split_word(rest);
                if sub.eq_ignore_ascii_case("toggle") {
                    expect_end(rest, Command::SelfGreetToggle)
                } else {
                    Err(invalid("selfgreet expects 'toggle'"))
                }
            }
            "status" => expect_end(rest, Command::Status),
            "ignore" => player_argument(rest).map(Command::Ignore),
            "unignore" => player_argument(rest).map(Command::Unignore),
            "mode" => {
                let (name, rest) = split_word(rest);
                if name.is_empty() {
                    return Err(invalid("mode expects default, constantiam or hypersafe"));
                }
                let mode = name.parse::<Mode>()?;
                expect_end(rest, Command::SetMode(mode))
            }
            "config" => parse_config(rest),
            "info" => expect_end(rest, Command::Info),
            "" => Err(invalid("missing subcommand")),
            other => Err(invalid(&format!("unknown subcommand '{}'", other))),
        }
    }
}

/// Whether `line` starts with the command prefix, compared the way [`Command::parse`] strips it
pub fn is_command_line(line: &str) -> bool {
    strip_prefix_ci(line, COMMAND_PREFIX).is_some()
}

fn parse_config(input: &str) -> WelcomerResult<Command> {
    let (sub, rest) = split_word(input);
    match sub.to_ascii_lowercase().as_str() {
        "reload" => expect_end(rest, Command::ReloadMessages),
        "reloadself" => expect_end(rest, Command::ReloadSelfMessages),
        "add" => message_argument(rest).map(Command::AddMessage),
        "addself" => message_argument(rest).map(Command::AddSelfMessage),
        _ => Err(invalid("config expects reload, reloadself, add or addself")),
    }
}

fn invalid(reason: &str) -> WelcomerError {
    WelcomerError::InvalidCommand(reason.to_string())
}

fn strip_prefix_ci<'a>(input: &'a str, prefix: &str) -> Option<&'a str> {
    let head = input.get(..prefix.len())?;
    if !head.eq_ignore_ascii_case(prefix) {
        return None;
    }
    let rest = &input[prefix.len()..];
    // "/welcomerx" is not the prefix
    (rest.is_empty() || rest.starts_with(char::is_whitespace)).then_some(rest)
}

/// First whitespace-delimited word and the remainder after it
fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.find(char::is_whitespace) {
        Some(idx) => (&input[..idx], input[idx..].trim_start()),
        None => (input, ""),
    }
}

fn expect_end(rest: &str, command: Command) -> WelcomerResult<Command> {
    if rest.trim().is_empty() {
        Ok(command)
    } else {
        Err(invalid(&format!("unexpected argument '{}'", rest.trim())))
    }
}

fn player_argument(rest: &str) -> WelcomerResult<String> {
    let rest = rest.trim();

    let (player, tail) = if let Some(quoted) = rest.strip_prefix('"') {
        let end = quoted
            .find('"')
            .ok_or_else(|| invalid("unterminated quoted player name"))?;
        (&quoted[..end], &quoted[end + 1..])
    } else {
        split_word(rest)
    };

    if player.is_empty() {
        return Err(invalid("missing player name"));
    }
    if !tail.trim().is_empty() {
        return Err(invalid(&format!("unexpected argument '{}'", tail.trim())));
    }
    Ok(player.to_string())
}

fn message_argument(rest: &str) -> WelcomerResult<String> {
    let message = rest.trim();
    if message.is_empty() {
        return Err(invalid("missing message"));
    }
    Ok(message.to_string())
}
