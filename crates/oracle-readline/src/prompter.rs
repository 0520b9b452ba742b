use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

/// Source of user input lines.
pub trait Prompter {
    /// Shows `prompt` and reads one line. `None` means the input is closed
    /// (EOF, Ctrl-C, or an unreadable terminal).
    fn read_line(&mut self, prompt: &str) -> Option<String>;
}

/// Reads from the terminal via rustyline.
pub struct ReadlinePrompter {
    editor: DefaultEditor,
}

impl ReadlinePrompter {
    pub fn new() -> rustyline::Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl Prompter for ReadlinePrompter {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        match self.editor.readline(prompt) {
            Ok(line) => Some(line),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => None,
            Err(err) => {
                tracing::error!("Failed to read input: {:?}", err);
                None
            }
        }
    }
}
