//! Application controller: owns the form, the configuration and the runner,
//! and turns [`Command`]s into state changes and side effects.

use super::dialog::{MessageDialog, PathPrompt, PromptPurpose};
use super::{input, AppEvent, AppEventSender};
use crate::config::AppConfig;
use crate::desktop::{Desktop, DESCRIPTION, PROGRAM_NAME, SOURCE_URL};
use crate::document::PaperIntroductionDocument;
use crate::editor::{Action, EditorState};
use crate::error::Result;
use crate::llm::LlmClient;
use crate::prompts;
use crate::runner::{GenerationOutcome, GenerationRunner};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What keys currently drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
    Prompt,
    Dialog,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Editor(Action),
    Load,
    Save,
    Generate,
    PromptOnly,
    OpenLlmConfig,
    OpenUsage,
    OpenGeneralConfig,
    About,
    Help,
    Quit,
    DialogClose,
    DialogCopy,
    DialogScroll(i32),
    PromptInput(char),
    PromptPaste(String),
    PromptBackspace,
    PromptComplete,
    PromptSubmit,
    PromptCancel,
}

/// Last status message and when it was set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub at: DateTime<Local>,
}

/// One toolbar button as rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolbarItem<'a> {
    pub key: &'static str,
    pub label: &'a str,
    pub tooltip: &'a str,
    pub enabled: bool,
}

impl<'a> ToolbarItem<'a> {
    fn new(key: &'static str, label: &'a str, tooltip: &'a str) -> Self {
        Self {
            key,
            label,
            tooltip,
            enabled: true,
        }
    }
}

const MISSING_DATA: &str =
    "Please fill at least one relevant field before generating the introduction.";

pub struct App<D: Desktop> {
    editor: EditorState,
    config: AppConfig,
    runner: GenerationRunner,
    events: AppEventSender,
    desktop: D,
    dialog: Option<MessageDialog>,
    prompt: Option<PathPrompt>,
    status: Option<Status>,
    current_path: Option<PathBuf>,
    should_quit: bool,
}

impl<D: Desktop> App<D> {
    pub fn new(config: AppConfig, events: AppEventSender, desktop: D) -> Self {
        Self {
            editor: EditorState::new(),
            config,
            runner: GenerationRunner::new(LlmClient::new()),
            events,
            desktop,
            dialog: None,
            prompt: None,
            status: None,
            current_path: None,
            should_quit: false,
        }
    }

    pub fn editor(&self) -> &EditorState {
        &self.editor
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn desktop(&self) -> &D {
        &self.desktop
    }

    pub fn dialog(&self) -> Option<&MessageDialog> {
        self.dialog.as_ref()
    }

    pub fn prompt(&self) -> Option<&PathPrompt> {
        self.prompt.as_ref()
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn is_generating(&self) -> bool {
        self.runner.is_pending()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn input_mode(&self) -> InputMode {
        if self.dialog.is_some() {
            InputMode::Dialog
        } else if self.prompt.is_some() {
            InputMode::Prompt
        } else if self.editor.is_editing() {
            InputMode::Editing
        } else {
            InputMode::Normal
        }
    }

    pub fn toolbar(&self) -> Vec<ToolbarItem<'_>> {
        let g = &self.config.general;
        let item = ToolbarItem::new;
        vec![
            item("F2", &g.toolbar_load, &g.toolbar_load_tooltip),
            item("F3", &g.toolbar_save, &g.toolbar_save_tooltip),
            ToolbarItem {
                enabled: !self.runner.is_pending(),
                ..item("F4", &g.toolbar_generate, &g.toolbar_generate_tooltip)
            },
            item("F5", &g.toolbar_prompt, &g.toolbar_prompt_tooltip),
            item("F6", &g.toolbar_llm_conf, &g.toolbar_llm_conf_tooltip),
            item("F7", &g.toolbar_url_usage, &g.toolbar_url_usage_tooltip),
            item("F8", &g.toolbar_configure, &g.toolbar_configure_tooltip),
            item("F9", &g.toolbar_about, &g.toolbar_about_tooltip),
        ]
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Key(key) => {
                if let Some(command) = input::map_key(self.input_mode(), key) {
                    self.dispatch(command);
                }
            }
            AppEvent::Paste(text) => match self.input_mode() {
                InputMode::Editing => self.dispatch(Command::Editor(Action::Paste(text))),
                InputMode::Prompt => self.dispatch(Command::PromptPaste(text)),
                InputMode::Normal | InputMode::Dialog => {}
            },
            AppEvent::Resize => {}
            AppEvent::Generation(outcome) => self.on_generation(outcome),
        }
    }

    pub fn dispatch(&mut self, command: Command) {
        match command {
            Command::Editor(action) => {
                if let Some(notice) = self.editor.apply(action) {
                    self.dialog = Some(MessageDialog::warning(&notice.title, notice.message));
                }
            }
            Command::Load => {
                let initial = self
                    .current_path
                    .as_deref()
                    .and_then(Path::parent)
                    .filter(|dir| !dir.as_os_str().is_empty())
                    .map(|dir| format!("{}{}", dir.display(), std::path::MAIN_SEPARATOR))
                    .unwrap_or_default();
                self.prompt = Some(PathPrompt::new(PromptPurpose::Load, initial));
            }
            Command::Save => {
                let initial = self
                    .current_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                self.prompt = Some(PathPrompt::new(PromptPurpose::Save, initial));
            }
            Command::Generate => self.generate(),
            Command::PromptOnly => self.show_prompt(),
            Command::OpenLlmConfig => {
                let path = self.config.llm_file.path().to_path_buf();
                self.open_path(&path);
            }
            Command::OpenUsage => {
                let url = self.config.llm.usage.clone();
                if let Err(e) = self.desktop.open_url(&url) {
                    self.fail(e.to_string());
                }
            }
            Command::OpenGeneralConfig => {
                let path = self.config.general_file.path().to_path_buf();
                self.open_path(&path);
            }
            Command::About => {
                let mut dialog = MessageDialog::info(
                    PROGRAM_NAME,
                    format!(
                        "Version {}\n\n{}\n\nSource: {}",
                        env!("CARGO_PKG_VERSION"),
                        DESCRIPTION,
                        SOURCE_URL
                    ),
                );
                dialog.title = "About".to_string();
                self.dialog = Some(dialog);
            }
            Command::Help => {
                let mut dialog = MessageDialog::info("Keys", self.help_text());
                dialog.title = "Help".to_string();
                self.dialog = Some(dialog);
            }
            Command::Quit => self.should_quit = true,
            Command::DialogClose => self.dialog = None,
            Command::DialogCopy => self.copy_dialog(),
            Command::DialogScroll(delta) => {
                if let Some(dialog) = self.dialog.as_mut() {
                    dialog.scroll_by(delta);
                }
            }
            Command::PromptInput(c) => {
                if let Some(prompt) = self.prompt.as_mut() {
                    prompt.push(c);
                }
            }
            Command::PromptPaste(text) => {
                if let Some(prompt) = self.prompt.as_mut() {
                    prompt.push_str(&text);
                }
            }
            Command::PromptBackspace => {
                if let Some(prompt) = self.prompt.as_mut() {
                    prompt.backspace();
                }
            }
            Command::PromptComplete => {
                if let Some(prompt) = self.prompt.as_mut() {
                    prompt.complete();
                }
            }
            Command::PromptSubmit => self.submit_prompt(),
            Command::PromptCancel => self.prompt = None,
        }
    }

    /// Show `message` in an error dialog, e.g. configuration problems found
    /// before the editor opened.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.fail(message.into());
    }

    fn set_status(&mut self, text: impl Into<String>) {
        let text = text.into();
        debug!(status = %text, "Status");
        self.status = Some(Status {
            text,
            at: Local::now(),
        });
    }

    fn fail(&mut self, message: String) {
        warn!(error = %message, "Action failed");
        self.dialog = Some(MessageDialog::error(message));
    }

    fn open_path(&mut self, path: &Path) {
        self.set_status(format!("Open: {}", path.display()));
        if let Err(e) = self.desktop.open_path(path) {
            self.fail(e.to_string());
        }
    }

    // ========================================================================
    // Generation
    // ========================================================================

    fn generate(&mut self) {
        if self.runner.is_pending() {
            debug!("Generation already in flight");
            return;
        }

        let document = self.editor.document();
        if document.is_empty() {
            self.dialog = Some(MessageDialog::warning("Missing data", MISSING_DATA));
            return;
        }

        if !self.config.llm.has_api_key() {
            if let Err(e) = self.config.reload_llm() {
                self.fail(format!(
                    "Failed to reload {}: {}",
                    self.config.llm_file.path().display(),
                    e
                ));
            }
        }
        if !self.config.llm.has_api_key() {
            info!("No API key configured; opening the LLM configuration");
            let path = self.config.llm_file.path().to_path_buf();
            let usage = self.config.llm.usage.clone();
            self.open_path(&path);
            if let Err(e) = self.desktop.open_url(&usage) {
                warn!(error = %e, "Failed to open usage page");
            }
            return;
        }

        let events = self.events.clone();
        let started = self.runner.start(self.config.llm.clone(), document, move |outcome| {
            events.send(AppEvent::Generation(outcome));
        });
        match started {
            Ok(()) => self.set_status("Consulting LLM… please wait"),
            Err(_) => debug!("Generation already in flight"),
        }
    }

    fn on_generation(&mut self, outcome: GenerationOutcome) {
        self.runner.settle();
        match outcome {
            GenerationOutcome::Success(text) => {
                self.set_status("Done");
                self.dialog = Some(MessageDialog::info("LLM response:", text));
            }
            GenerationOutcome::Failure(message) => {
                self.set_status("Error");
                self.dialog = Some(MessageDialog::error(message));
            }
        }
    }

    fn show_prompt(&mut self) {
        match prompts::build_text_only(&self.editor.document()) {
            Ok(text) => {
                let mut dialog = MessageDialog::info("Prompt:", text);
                dialog.title = "Prompt only".to_string();
                self.dialog = Some(dialog);
            }
            Err(e) => self.fail(e.to_string()),
        }
    }

    // ========================================================================
    // Files and dialogs
    // ========================================================================

    fn submit_prompt(&mut self) {
        let Some(prompt) = self.prompt.take() else {
            return;
        };
        let Some(path) = prompt.path() else {
            return;
        };
        let result = match prompt.purpose {
            PromptPurpose::Load => self.load_document(&path),
            PromptPurpose::Save => self.save_document(&path),
        };
        if let Err(e) = result {
            self.fail(e.to_string());
        }
    }

    fn load_document(&mut self, path: &Path) -> Result<()> {
        let document = PaperIntroductionDocument::load(path)?;
        self.editor.apply(Action::Load(Box::new(document)));
        self.current_path = Some(path.to_path_buf());
        self.set_status(format!("Loaded from {}", path.display()));
        Ok(())
    }

    fn save_document(&mut self, path: &Path) -> Result<()> {
        let saved = self.editor.document().save(path)?;
        self.set_status(format!("Saved to {}", saved.display()));
        self.current_path = Some(saved);
        Ok(())
    }

    fn copy_dialog(&mut self) {
        let Some(dialog) = self.dialog.as_ref().filter(|d| d.can_copy()) else {
            return;
        };
        let body = dialog.body.clone();
        match self.desktop.copy_to_clipboard(&body) {
            Ok(()) => self.set_status("Copied to clipboard"),
            Err(e) => {
                warn!(error = %e, "Clipboard copy failed");
                self.set_status(format!("Copy failed: {}", e));
            }
        }
    }

    fn help_text(&self) -> String {
        let mut text = String::from(
            "←/→  switch section\n\
             Tab/Shift-Tab  move focus\n\
             ↑/↓  select list entry or reference\n\
             Enter  edit (commit while editing)\n\
             Alt-Enter  new line in multi-line fields\n\
             Esc  cancel edit / close dialog\n\
             a  add entry or reference\n\
             d/Delete  remove entry or reference\n\
             Ctrl-Q  quit\n\n",
        );
        for item in self.toolbar() {
            text.push_str(&format!("{}  {}: {}\n", item.key, item.label, item.tooltip));
        }
        text
    }
}
