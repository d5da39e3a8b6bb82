use codenames::codenames_core::{CoreAction, Role, SettingKey};
use codenames::parse_key;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Action(CoreAction),
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  guess <n>        reveal word n
  end              end your team's turn
  next [yes]       start the next game (`yes` confirms replacing an unfinished one)
  role player|spymaster
  toggle <setting> color-blind, dark-mode, fullscreen, spymaster-may-guess
  settings         open or close the settings view
  esc              back to the board
  show             print the board again
  quit";

pub fn parse_command(line: &str) -> Option<Command> {
    if let Some(key) = parse_key(line) {
        return Some(Command::Action(CoreAction::KeyDown(key)));
    }
    let mut parts = line.split_whitespace();
    let head = parts.next()?.to_ascii_lowercase();
    let arg = parts.next();
    let command = match head.as_str() {
        "guess" | "g" => Command::Action(CoreAction::Guess {
            index: arg?.parse().ok()?,
        }),
        "end" | "pass" => Command::Action(CoreAction::EndTurn),
        "next" => Command::Action(CoreAction::NextGame {
            confirmed: matches!(arg, Some("yes" | "y" | "confirm")),
        }),
        "role" => {
            let role = match arg?.to_ascii_lowercase().as_str() {
                "player" | "guesser" => Role::Player,
                "spymaster" | "codemaster" => Role::Codemaster,
                _ => return None,
            };
            Command::Action(CoreAction::SetRole(role))
        }
        "toggle" => Command::Action(CoreAction::ToggleSetting(SettingKey::parse(arg?)?)),
        "settings" => Command::Action(CoreAction::ToggleSettingsView),
        "show" | "board" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => {
            // a bare number is a guess
            let index = head.parse().ok()?;
            Command::Action(CoreAction::Guess { index })
        }
    };
    Some(command)
}
