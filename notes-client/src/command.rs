#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Refresh,
    Title(String),
    Content(String),
    Save,
    Add { title: String, content: String },
    Edit(String),
    Cancel,
    Delete(String),
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  list | refresh            reload notes from the server
  title <text>              set the form title
  content <text>            set the form content
  save                      create the note, or update the one being edited
  add <title> | <content>   fill the form and save in one step
  edit <id|#n>              load a note into the form
  cancel                    stop editing and clear the form
  delete <id|#n>            delete a note (asks for confirmation)
  help                      show this message
  quit                      exit";

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (name, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(name, rest)| (name, rest.trim()));

        let required = |what: &str| -> Result<String, String> {
            if rest.is_empty() {
                Err(format!("'{name}' needs {what}"))
            } else {
                Ok(rest.to_string())
            }
        };

        match name.to_ascii_lowercase().as_str() {
            "list" | "ls" | "refresh" => Ok(Self::Refresh),
            "title" => Ok(Self::Title(rest.to_string())),
            "content" => Ok(Self::Content(rest.to_string())),
            "save" => Ok(Self::Save),
            "add" => {
                let (title, content) = rest.split_once('|').unwrap_or((rest, ""));
                Ok(Self::Add {
                    title: title.trim().to_string(),
                    content: content.trim().to_string(),
                })
            }
            "edit" => required("a note id or #index").map(Self::Edit),
            "cancel" => Ok(Self::Cancel),
            "delete" | "rm" => required("a note id or #index").map(Self::Delete),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            "" => Err("Type 'help' for a list of commands".to_string()),
            other => Err(format!("Unknown command '{other}'. Type 'help'")),
        }
    }
}

/// Interprets a confirmation answer; anything but yes declines.
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
