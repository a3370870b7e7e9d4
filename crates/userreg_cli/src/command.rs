//! Interactive command parsing.

/// One operator action typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Submit the form (add or update depending on mode).
    Submit,
    /// Edit the user shown at a 1-based table row.
    Edit(usize),
    /// Delete the user shown at a 1-based table row.
    Delete(usize),
    Search(String),
    Clear,
    Toggle,
    List,
    /// Re-read storage changed by another session.
    Reload,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  add | submit       fill in the form and submit it
  edit <row>         load the user at <row> into the form
  delete <row>       delete the user at <row>
  search [term]      filter the table (no term shows everyone)
  clear              empty the form and leave edit mode
  toggle             show or hide the password while typing
  list               redraw the table
  reload             re-read users saved by another session
  help               show this text
  quit               exit";

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb.to_ascii_lowercase().as_str() {
            "add" | "submit" | "save" => Ok(Self::Submit),
            "edit" => parse_row(rest).map(Self::Edit),
            "delete" | "rm" => parse_row(rest).map(Self::Delete),
            "search" | "find" => Ok(Self::Search(rest.to_string())),
            "clear" => Ok(Self::Clear),
            "toggle" => Ok(Self::Toggle),
            "list" | "ls" => Ok(Self::List),
            "reload" => Ok(Self::Reload),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            "" => Err("type `help` for a list of commands".to_string()),
            other => Err(format!("unknown command `{other}`; type `help`")),
        }
    }
}

fn parse_row(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(row) if row > 0 => Ok(row),
        _ => Err(format!("expected a row number, got `{raw}`")),
    }
}
