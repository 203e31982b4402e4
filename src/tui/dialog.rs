//! Modal dialogs and the file path prompt.

use crate::document::has_document_suffix;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Info,
    Warning,
    Error,
}

/// Scrollable message box; Info and Error offer copy to clipboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDialog {
    pub kind: DialogKind,
    pub title: String,
    pub heading: String,
    pub body: String,
    pub scroll: u16,
}

impl MessageDialog {
    fn new(kind: DialogKind, title: &str, heading: &str, body: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.to_string(),
            heading: heading.to_string(),
            body: body.into(),
            scroll: 0,
        }
    }

    pub fn info(heading: &str, body: impl Into<String>) -> Self {
        Self::new(DialogKind::Info, "Information message", heading, body)
    }

    pub fn warning(title: &str, body: impl Into<String>) -> Self {
        Self::new(DialogKind::Warning, title, "", body)
    }

    pub fn error(body: impl Into<String>) -> Self {
        Self::new(DialogKind::Error, "Error message", "An error occurred:", body)
    }

    pub fn can_copy(&self) -> bool {
        self.kind != DialogKind::Warning
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let max = self.body.lines().count().saturating_sub(1);
        let next = (i64::from(self.scroll) + i64::from(delta)).clamp(0, max as i64);
        self.scroll = u16::try_from(next).unwrap_or(u16::MAX);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptPurpose {
    Load,
    Save,
}

impl PromptPurpose {
    pub fn title(self) -> &'static str {
        match self {
            PromptPurpose::Load => " Load document (*.intro.json) ",
            PromptPurpose::Save => " Save document as (*.intro.json) ",
        }
    }
}

/// One-line path input with Tab completion over document files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrompt {
    pub purpose: PromptPurpose,
    pub input: String,
    candidates: Vec<PathBuf>,
    cycle: usize,
}

impl PathPrompt {
    pub fn new(purpose: PromptPurpose, initial: impl Into<String>) -> Self {
        Self {
            purpose,
            input: initial.into(),
            candidates: Vec::new(),
            cycle: 0,
        }
    }

    pub fn push(&mut self, c: char) {
        self.input.push(c);
        self.candidates.clear();
    }

    pub fn push_str(&mut self, text: &str) {
        self.input.push_str(text.trim_end_matches(['\r', '\n']));
        self.candidates.clear();
    }

    pub fn backspace(&mut self) {
        self.input.pop();
        self.candidates.clear();
    }

    /// Replace the input with the next matching document file, if any.
    pub fn complete(&mut self) {
        if self.candidates.is_empty() {
            self.candidates = document_candidates(&self.input);
            self.cycle = 0;
        } else {
            self.cycle = (self.cycle + 1) % self.candidates.len();
        }
        if let Some(path) = self.candidates.get(self.cycle) {
            self.input = path.display().to_string();
        }
    }

    /// Trimmed input as a path, or None when blank.
    pub fn path(&self) -> Option<PathBuf> {
        let trimmed = self.input.trim();
        (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
    }
}

/// Document files in the directory part of `input` whose names start with
/// its file part, sorted. A trailing `.` or `..` names a directory.
pub fn document_candidates(input: &str) -> Vec<PathBuf> {
    let sep = std::path::MAIN_SEPARATOR;
    let (dir, prefix) = match input.rfind(sep) {
        Some(idx) => input.split_at(idx + sep.len_utf8()),
        None => ("", input),
    };
    let (dir, prefix) = if prefix == "." || prefix == ".." {
        (format!("{}{}", input, sep), "")
    } else {
        (dir.to_string(), prefix)
    };

    let read_from = if dir.is_empty() { Path::new(".") } else { Path::new(&dir) };
    let Ok(entries) = std::fs::read_dir(read_from) else {
        return Vec::new();
    };

    let mut matches: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .filter(|name| name.starts_with(prefix) && has_document_suffix(Path::new(name)))
        .map(|name| PathBuf::from(format!("{}{}", dir, name)))
        .collect();
    matches.sort();
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_candidates_filter_by_suffix_and_prefix() -> std::io::Result<()> {
        let dir = TempDir::new()?;
        for name in ["alpha.intro.json", "beta.intro.json", "alpha.json", "notes.txt"] {
            std::fs::write(dir.path().join(name), "{}")?;
        }
        std::fs::create_dir(dir.path().join("sub.intro.json"))?;

        let base = format!("{}{}", dir.path().display(), std::path::MAIN_SEPARATOR);
        let all = document_candidates(&base);
        assert_eq!(
            all,
            vec![
                PathBuf::from(format!("{}alpha.intro.json", base)),
                PathBuf::from(format!("{}beta.intro.json", base)),
            ]
        );

        let only_beta = document_candidates(&format!("{}b", base));
        assert_eq!(only_beta, vec![PathBuf::from(format!("{}beta.intro.json", base))]);
        Ok(())
    }

    #[test]
    fn test_prompt_tab_cycles() -> std::io::Result<()> {
        let dir = TempDir::new()?;
        std::fs::write(dir.path().join("a.intro.json"), "{}")?;
        std::fs::write(dir.path().join("b.intro.json"), "{}")?;
        let base = format!("{}{}", dir.path().display(), std::path::MAIN_SEPARATOR);

        let mut prompt = PathPrompt::new(PromptPurpose::Load, base.clone());
        prompt.complete();
        assert_eq!(prompt.input, format!("{}a.intro.json", base));
        prompt.complete();
        assert_eq!(prompt.input, format!("{}b.intro.json", base));
        prompt.complete();
        assert_eq!(prompt.input, format!("{}a.intro.json", base));
        Ok(())
    }

    #[test]
    fn test_completion_with_non_ascii_dir_and_trailing_dot() -> std::io::Result<()> {
        let dir = TempDir::new()?;
        let sep = std::path::MAIN_SEPARATOR;
        std::fs::create_dir(dir.path().join("xé"))?;
        std::fs::write(dir.path().join("xé").join("a.intro.json"), "{}")?;

        let input = format!("{}{}xé{}.", dir.path().display(), sep, sep);
        let expected = PathBuf::from(format!("{}{}a.intro.json", input, sep));
        assert_eq!(document_candidates(&input), vec![expected.clone()]);

        let mut prompt = PathPrompt::new(PromptPurpose::Load, input);
        prompt.complete();
        assert_eq!(PathBuf::from(&prompt.input), expected);

        let no_dir = format!("xé{}.", sep);
        assert!(document_candidates(&no_dir).is_empty());
        Ok(())
    }

    #[test]
    fn test_blank_prompt_has_no_path() {
        let prompt = PathPrompt::new(PromptPurpose::Save, "   ");
        assert_eq!(prompt.path(), None);
    }

    #[test]
    fn test_dialog_scroll_is_clamped() {
        let mut dialog = MessageDialog::info("LLM response:", "one\ntwo\nthree");
        dialog.scroll_by(-3);
        assert_eq!(dialog.scroll, 0);
        dialog.scroll_by(10);
        assert_eq!(dialog.scroll, 2);
        assert!(dialog.can_copy());
        assert!(!MessageDialog::warning("Missing data", "x").can_copy());
    }
}
