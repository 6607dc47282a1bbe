use crate::models::Endpoint;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Exit,
    Clear,
    Help,
    Select(Endpoint),
    Message(String),
}

impl FromStr for Command {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let lowered = s.to_lowercase();
        Ok(match lowered.as_str() {
            "exit" | "quit" => Command::Exit,
            "clear" => Command::Clear,
            "help" => Command::Help,
            other => match other.strip_prefix('/').map(str::parse::<Endpoint>) {
                Some(Ok(endpoint)) => Command::Select(endpoint),
                _ => Command::Message(s.to_string()),
            },
        })
    }
}

pub const COMMAND_BOX: &str = "\
┌──────────────────────────────────────────────┐\n\
│              Available Commands              │\n\
├──────────────────────────────────────────────┤\n\
│  /answer    - chat with the assistant        │\n\
│  /kbanswer  - answer from the knowledge base │\n\
│  /search    - list matching source documents │\n\
├──────────────────────────────────────────────┤\n\
│  clear      - clear the chat                 │\n\
│  help       - show this box                  │\n\
│  exit       - quit the application           │\n\
└──────────────────────────────────────────────┘";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_control_words() {
        assert_eq!("exit".parse::<Command>(), Ok(Command::Exit));
        assert_eq!(" QUIT ".parse::<Command>(), Ok(Command::Exit));
        assert_eq!("Clear".parse::<Command>(), Ok(Command::Clear));
        assert_eq!("help".parse::<Command>(), Ok(Command::Help));
    }

    #[test]
    fn slash_names_select_endpoints() {
        assert_eq!("/search".parse::<Command>(), Ok(Command::Select(Endpoint::Search)));
        assert_eq!("/KbAnswer".parse::<Command>(), Ok(Command::Select(Endpoint::KbAnswer)));
        assert_eq!("/answer".parse::<Command>(), Ok(Command::Select(Endpoint::Answer)));
    }

    #[test]
    fn anything_else_is_a_message() {
        assert_eq!("/ask me".parse::<Command>(), Ok(Command::Message("/ask me".into())));
        assert_eq!("  clear the table  ".parse::<Command>(), Ok(Command::Message("clear the table".into())));
        assert_eq!("".parse::<Command>(), Ok(Command::Message(String::new())));
    }
}
