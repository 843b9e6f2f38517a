/// A console line, standing in for the card buttons
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Popup id prefix; `None` means the newest popup
    Add(Option<String>),
    Copy(Option<String>),
    Close(Option<String>),
    Export,
    Translate(String),
    List,
    Help,
}

pub const HELP: &str =
    "commands: add [id] | copy [id] | close [id] | export | list | t <text> | help";

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    let target = (!rest.is_empty()).then(|| rest.to_string());

    match verb.to_ascii_lowercase().as_str() {
        "a" | "add" => Ok(Command::Add(target)),
        "c" | "copy" => Ok(Command::Copy(target)),
        "q" | "close" => Ok(Command::Close(target)),
        "e" | "export" => Ok(Command::Export),
        "l" | "ls" | "list" => Ok(Command::List),
        "h" | "help" | "?" => Ok(Command::Help),
        "t" | "translate" if !rest.is_empty() => Ok(Command::Translate(rest.to_string())),
        "t" | "translate" => Err("nothing to translate".to_string()),
        "" => Err("empty command".to_string()),
        other => Err(format!("unknown command: {other}")),
    }
}
