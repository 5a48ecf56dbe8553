// ---------------------------------------------------------------------------
// line_editor: rustyline wrapper for the order REPL
// ---------------------------------------------------------------------------
//
// Readline-style editing for customer input:
//   - Up/Down arrow: history cycling
//   - Ctrl-A / Ctrl-E: beginning / end of line
//   - Ctrl-D: EOF
//   - Ctrl-C: interrupt (re-prompt)
//
// History is persisted to ~/.order_droid_history (max 500 entries).

use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor, EditMode};
use std::path::{Path, PathBuf};

/// Maximum number of history entries to retain.
const MAX_HISTORY: usize = 500;

/// History file name (stored in user's home directory).
const HISTORY_FILE: &str = ".order_droid_history";

/// Result of a single line read.
pub enum ReadResult {
    /// User entered a line of text.
    Line(String),
    /// User pressed Ctrl-C (interrupt).
    Interrupted,
    /// User pressed Ctrl-D or stdin closed (EOF).
    Eof,
}

/// Wrapper around rustyline's DefaultEditor.
pub struct LineEditor {
    editor: DefaultEditor,
    history_path: Option<PathBuf>,
}

impl LineEditor {
    /// Emacs-mode editor with history loaded from `~/.order_droid_history`.
    pub fn new() -> rustyline::Result<Self> {
        Self::with_history(dirs_home().map(|home| home.join(HISTORY_FILE)))
    }

    /// Editor persisting history at `history_path` (none when `None`).
    /// A missing or unreadable history file starts an empty history.
    pub fn with_history(history_path: Option<PathBuf>) -> rustyline::Result<Self> {
        let config = Config::builder()
            .edit_mode(EditMode::Emacs)
            .max_history_size(MAX_HISTORY)?
            .auto_add_history(false)
            .build();

        let mut editor = DefaultEditor::with_config(config)?;

        if let Some(ref path) = history_path {
            if let Err(e) = editor.load_history(path) {
                tracing::debug!(path = %path.display(), error = %e, "no usable history");
            }
        }

        Ok(LineEditor {
            editor,
            history_path,
        })
    }

    pub fn history_path(&self) -> Option<&Path> {
        self.history_path.as_deref()
    }

    /// Read a line with the given prompt string. The line is not added to
    /// history; call `add_history` for lines worth remembering.
    pub fn read_line(&mut self, prompt: &str) -> ReadResult {
        match self.editor.readline(prompt) {
            Ok(line) => ReadResult::Line(line),
            Err(ReadlineError::Interrupted) => ReadResult::Interrupted,
            Err(ReadlineError::Eof) => ReadResult::Eof,
            Err(e) => {
                tracing::warn!(error = %e, "readline failed");
                ReadResult::Eof
            }
        }
    }

    /// Add a line to the in-memory history and persist to disk.
    pub fn add_history(&mut self, line: &str) {
        let _ = self.editor.add_history_entry(line);
        self.save_history();
    }

    /// Persist history to disk. Unwritable files are ignored.
    pub fn save_history(&mut self) {
        if let Some(ref path) = self.history_path {
            if let Err(e) = self.editor.save_history(path) {
                tracing::debug!(path = %path.display(), error = %e, "history not saved");
            }
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_path_is_in_home() {
        if let Some(home) = dirs_home() {
            let expected = home.join(HISTORY_FILE);
            assert!(expected.to_str().unwrap().contains(".order_droid_history"));
        }
    }

    #[test]
    fn test_editor_without_history() {
        let editor = LineEditor::with_history(None).unwrap();
        assert!(editor.history_path().is_none());
    }

    #[test]
    fn test_add_history_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history");
        let mut editor = LineEditor::with_history(Some(path.clone())).unwrap();
        editor.add_history("a burger please");
        editor.add_history("no thanks");
        let saved = std::fs::read_to_string(&path).unwrap();
        assert!(saved.contains("a burger please"), "got: {}", saved);
    }

    #[test]
    fn test_corrupt_history_file_does_not_crash() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history");
        std::fs::write(&path, b"\xff\xfe\x00\x01binary garbage\n\x80\x90").unwrap();
        let editor = LineEditor::with_history(Some(path));
        assert!(editor.is_ok());
    }
}
