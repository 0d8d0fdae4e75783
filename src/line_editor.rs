use rustyline::{error::ReadlineError, DefaultEditor};

/// Prompt shown before each command.
pub const PROMPT: &str = "OX> ";

/// Interactive line source with history, backed by rustyline.
///
/// Iterating yields one raw line per prompt and stops at end of input or on
/// interrupt. The terminal is restored when the editor is dropped.
pub struct LineEditor {
    editor: DefaultEditor,
    prompt: String,
}

impl LineEditor {
    pub fn new(prompt: &str) -> Result<Self, ReadlineError> {
        Ok(Self {
            editor: DefaultEditor::new()?,
            prompt: prompt.to_string(),
        })
    }
}

impl Iterator for LineEditor {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        match self.editor.readline(&self.prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    if let Err(err) = self.editor.add_history_entry(line.as_str()) {
                        log::warn!("Unable to record history: {err}");
                    }
                }
                Some(line)
            }
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => None,
            Err(err) => {
                log::error!("Unable to read input: {err}");
                None
            }
        }
    }
}
