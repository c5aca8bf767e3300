use slytherin_common::games::snake::{Direction, InputEvent};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunnerCommand {
    Input(InputEvent),
    /// Request a frame print without changing the game.
    Show,
    Quit,
}

/// Parses one stdin line. Unknown or malformed lines yield `None`.
pub fn parse_command(line: &str) -> Option<RunnerCommand> {
    let trimmed = line.trim();
    let (word, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (trimmed, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "w" | "up" => RunnerCommand::Input(InputEvent::SetDirection(Direction::Up)),
        "s" | "down" => RunnerCommand::Input(InputEvent::SetDirection(Direction::Down)),
        "a" | "left" => RunnerCommand::Input(InputEvent::SetDirection(Direction::Left)),
        "d" | "right" => RunnerCommand::Input(InputEvent::SetDirection(Direction::Right)),
        "p" | "pause" | "space" => RunnerCommand::Input(InputEvent::TogglePause),
        "n" | "new" | "start" => RunnerCommand::Input(InputEvent::StartNewGame),
        "level" => {
            let level = rest.parse::<u8>().ok()?;
            RunnerCommand::Input(InputEvent::SetLevel(level))
        }
        // Case and inner spaces of the name are kept.
        "name" if !rest.is_empty() => {
            RunnerCommand::Input(InputEvent::SetPlayerName(rest.to_string()))
        }
        "show" => RunnerCommand::Show,
        "q" | "quit" => RunnerCommand::Quit,
        _ => return None,
    };

    Some(command)
}
