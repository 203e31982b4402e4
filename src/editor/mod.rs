//! Form editor state.
//!
//! [`EditorState`] is the single store behind the terminal UI. Every change
//! goes through [`EditorState::apply`] with an [`Action`]; rendering only
//! reads. The document is produced on demand by [`EditorState::document`],
//! which flushes the reference detail form first.

pub mod fields;
pub mod references;

pub use fields::{FieldId, FieldKind, ListField, Section, LIST_PLACEHOLDER};
pub use references::{next_reference_key, ReferenceForm, ReferencesEditor, RenameError};

use crate::document::{
    HumanCuratedSynthesis, PaperIntroductionDocument, PaperProfile, RelatedWork, ResearchProblem,
};
use tracing::debug;

/// What an open edit buffer will be written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    Field(FieldId),
    ListEntry(FieldId, usize),
    ReferenceKey(String),
}

/// Text being edited, committed on [`Action::Commit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBuffer {
    pub target: EditTarget,
    pub text: String,
}

/// Every mutation the form accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    NextSection,
    PrevSection,
    FocusNext,
    FocusPrev,
    /// Move the selection inside the focused list or reference keys
    SelectNext,
    SelectPrev,
    /// Open the focused field (or selected entry / key) for editing
    Edit,
    /// Add a list entry or a reference, depending on focus
    Add,
    /// Remove the selected list entry or reference
    Remove,
    Input(char),
    Paste(String),
    Newline,
    Backspace,
    Commit,
    Cancel,
    Load(Box<PaperIntroductionDocument>),
}

/// User-facing warning produced by an action; the state is left consistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl From<RenameError> for Notice {
    fn from(err: RenameError) -> Self {
        Self {
            title: err.title().to_string(),
            message: err.to_string(),
        }
    }
}

/// Editable values outside the reference map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Form {
    title: String,
    domain: String,
    target_journal: String,
    keywords: ListField,
    author_summary: String,
    domain_overview: String,
    specific_problem: String,
    practical_challenges: ListField,
    why_insufficient: String,
    contributions: ListField,
    common_trends: ListField,
    open_problems: ListField,
    research_gap: String,
    writing_guidelines: String,
}

impl Form {
    fn from_document(document: &PaperIntroductionDocument) -> Self {
        let profile = &document.paper_profile;
        let problem = &document.research_problem;
        let synthesis = &document.related_work.human_curated_synthesis;
        Self {
            title: profile.title.clone(),
            domain: profile.domain.clone(),
            target_journal: profile.target_journal.clone(),
            keywords: ListField::from_values(profile.keywords.clone()),
            author_summary: profile.author_intended_summary.clone(),
            domain_overview: problem.research_domain_overview.clone(),
            specific_problem: problem.specific_problem.clone(),
            practical_challenges: ListField::from_values(problem.practical_challenges.clone()),
            why_insufficient: problem.why_existing_solutions_are_insufficient.clone(),
            contributions: ListField::from_values(document.contributions.clone()),
            common_trends: ListField::from_values(synthesis.common_trends.clone()),
            open_problems: ListField::from_values(synthesis.open_problems.clone()),
            research_gap: synthesis.explicit_research_gap.clone(),
            writing_guidelines: document.writing_guidelines.clone(),
        }
    }

    fn text(&self, field: FieldId) -> Option<&String> {
        match field {
            FieldId::Title => Some(&self.title),
            FieldId::Domain => Some(&self.domain),
            FieldId::TargetJournal => Some(&self.target_journal),
            FieldId::AuthorSummary => Some(&self.author_summary),
            FieldId::DomainOverview => Some(&self.domain_overview),
            FieldId::SpecificProblem => Some(&self.specific_problem),
            FieldId::WhyInsufficient => Some(&self.why_insufficient),
            FieldId::ResearchGap => Some(&self.research_gap),
            FieldId::WritingGuidelines => Some(&self.writing_guidelines),
            _ => None,
        }
    }

    fn text_mut(&mut self, field: FieldId) -> Option<&mut String> {
        match field {
            FieldId::Title => Some(&mut self.title),
            FieldId::Domain => Some(&mut self.domain),
            FieldId::TargetJournal => Some(&mut self.target_journal),
            FieldId::AuthorSummary => Some(&mut self.author_summary),
            FieldId::DomainOverview => Some(&mut self.domain_overview),
            FieldId::SpecificProblem => Some(&mut self.specific_problem),
            FieldId::WhyInsufficient => Some(&mut self.why_insufficient),
            FieldId::ResearchGap => Some(&mut self.research_gap),
            FieldId::WritingGuidelines => Some(&mut self.writing_guidelines),
            _ => None,
        }
    }

    fn list(&self, field: FieldId) -> Option<&ListField> {
        match field {
            FieldId::Keywords => Some(&self.keywords),
            FieldId::PracticalChallenges => Some(&self.practical_challenges),
            FieldId::Contributions => Some(&self.contributions),
            FieldId::CommonTrends => Some(&self.common_trends),
            FieldId::OpenProblems => Some(&self.open_problems),
            _ => None,
        }
    }

    fn list_mut(&mut self, field: FieldId) -> Option<&mut ListField> {
        match field {
            FieldId::Keywords => Some(&mut self.keywords),
            FieldId::PracticalChallenges => Some(&mut self.practical_challenges),
            FieldId::Contributions => Some(&mut self.contributions),
            FieldId::CommonTrends => Some(&mut self.common_trends),
            FieldId::OpenProblems => Some(&mut self.open_problems),
            _ => None,
        }
    }
}

/// Whole form state: values, navigation and the open edit buffer.
#[derive(Debug, Clone, Default)]
pub struct EditorState {
    section: Section,
    focus: usize,
    edit: Option<EditBuffer>,
    form: Form,
    references: ReferencesEditor,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_document(document: &PaperIntroductionDocument) -> Self {
        let mut state = Self::new();
        state.load(document);
        state
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn edit(&self) -> Option<&EditBuffer> {
        self.edit.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.edit.is_some()
    }

    pub fn references(&self) -> &ReferencesEditor {
        &self.references
    }

    /// Fields that can take focus in the current section. Reference details
    /// are only reachable while a reference is selected.
    pub fn focusable(&self) -> Vec<FieldId> {
        let fields = self.section.fields();
        if self.section == Section::References && self.references.current().is_none() {
            return fields[..1].to_vec();
        }
        fields.to_vec()
    }

    pub fn focused(&self) -> Option<FieldId> {
        let focusable = self.focusable();
        focusable
            .get(self.focus.min(focusable.len().saturating_sub(1)))
            .copied()
    }

    pub fn text(&self, field: FieldId) -> Option<&str> {
        if field.is_reference_detail() {
            return self.references.form().text(field);
        }
        self.form.text(field).map(String::as_str)
    }

    fn text_mut(&mut self, field: FieldId) -> Option<&mut String> {
        if field.is_reference_detail() {
            return self.references.form_mut().text_mut(field);
        }
        self.form.text_mut(field)
    }

    pub fn list(&self, field: FieldId) -> Option<&ListField> {
        if field.is_reference_detail() {
            return self.references.form().list(field);
        }
        self.form.list(field)
    }

    fn list_mut(&mut self, field: FieldId) -> Option<&mut ListField> {
        if field.is_reference_detail() {
            return self.references.form_mut().list_mut(field);
        }
        self.form.list_mut(field)
    }

    /// Replace the whole form with `document`.
    pub fn load(&mut self, document: &PaperIntroductionDocument) {
        self.form = Form::from_document(document);
        self.references = ReferencesEditor::from_map(document.related_work.references.clone());
        self.edit = None;
        self.focus = 0;
    }

    /// Normalized document built from the form; flushes the reference form.
    pub fn document(&mut self) -> PaperIntroductionDocument {
        self.references.commit();
        let form = &self.form;
        PaperIntroductionDocument {
            paper_profile: PaperProfile {
                title: form.title.trim().to_string(),
                domain: form.domain.trim().to_string(),
                target_journal: form.target_journal.trim().to_string(),
                keywords: form.keywords.values(),
                author_intended_summary: form.author_summary.trim().to_string(),
            },
            research_problem: ResearchProblem {
                research_domain_overview: form.domain_overview.trim().to_string(),
                specific_problem: form.specific_problem.trim().to_string(),
                practical_challenges: form.practical_challenges.values(),
                why_existing_solutions_are_insufficient: form.why_insufficient.trim().to_string(),
            },
            contributions: form.contributions.values(),
            related_work: RelatedWork {
                references: self.references.to_map(),
                human_curated_synthesis: HumanCuratedSynthesis {
                    common_trends: form.common_trends.values(),
                    open_problems: form.open_problems.values(),
                    explicit_research_gap: form.research_gap.trim().to_string(),
                },
            },
            writing_guidelines: form.writing_guidelines.trim().to_string(),
        }
    }

    /// Apply one action. Returns a warning when the action was refused.
    pub fn apply(&mut self, action: Action) -> Option<Notice> {
        if self.edit.is_some() {
            return self.apply_editing(action);
        }

        match action {
            Action::NextSection => self.switch_section(self.section.next()),
            Action::PrevSection => self.switch_section(self.section.prev()),
            Action::FocusNext => {
                let len = self.focusable().len();
                self.focus = (self.focus.min(len.saturating_sub(1)) + 1) % len.max(1);
            }
            Action::FocusPrev => {
                let len = self.focusable().len().max(1);
                self.focus = (self.focus.min(len - 1) + len - 1) % len;
            }
            Action::SelectNext => self.move_selection(true),
            Action::SelectPrev => self.move_selection(false),
            Action::Edit => self.begin_edit(),
            Action::Add => self.add(),
            Action::Remove => self.remove(),
            Action::Load(document) => self.load(&document),
            Action::Input(_)
            | Action::Paste(_)
            | Action::Newline
            | Action::Backspace
            | Action::Commit
            | Action::Cancel => {}
        }
        None
    }

    fn apply_editing(&mut self, action: Action) -> Option<Notice> {
        let multiline = self
            .edit
            .as_ref()
            .is_some_and(|e| matches!(&e.target, EditTarget::Field(f) if f.kind() == FieldKind::Text));
        let buffer = self.edit.as_mut()?;

        match action {
            Action::Input(c) => buffer.text.push(c),
            Action::Paste(text) => {
                if multiline {
                    buffer.text.push_str(&text.replace("\r\n", "\n"));
                } else {
                    buffer.text.push_str(text.lines().collect::<Vec<_>>().join(" ").as_str());
                }
            }
            Action::Newline if multiline => buffer.text.push('\n'),
            Action::Backspace => {
                buffer.text.pop();
            }
            Action::Cancel => self.edit = None,
            Action::Commit => return self.commit_edit(),
            Action::Load(document) => self.load(&document),
            _ => {}
        }
        None
    }

    fn commit_edit(&mut self) -> Option<Notice> {
        let EditBuffer { target, text } = self.edit.take()?;
        match target {
            EditTarget::Field(field) => {
                if let Some(value) = self.text_mut(field) {
                    *value = text;
                }
            }
            EditTarget::ListEntry(field, idx) => {
                if let Some(list) = self.list_mut(field) {
                    list.set_entry(idx, text);
                }
            }
            EditTarget::ReferenceKey(_) => {
                if let Err(err) = self.references.rename(&text) {
                    debug!(error = %err, "Reference rename rejected");
                    return Some(err.into());
                }
            }
        }
        None
    }

    fn switch_section(&mut self, section: Section) {
        // the detail panel is shared scratch space; persist it before leaving
        self.references.commit();
        self.section = section;
        self.focus = 0;
    }

    fn move_selection(&mut self, forward: bool) {
        let Some(field) = self.focused() else {
            return;
        };
        match field.kind() {
            FieldKind::Keys => {
                if forward {
                    self.references.select_next();
                } else {
                    self.references.select_prev();
                }
            }
            FieldKind::List => {
                if let Some(list) = self.list_mut(field) {
                    if forward {
                        list.select_next();
                    } else {
                        list.select_prev();
                    }
                }
            }
            FieldKind::Line | FieldKind::Text => {}
        }
    }

    fn begin_edit(&mut self) {
        let Some(field) = self.focused() else {
            return;
        };
        let buffer = match field.kind() {
            FieldKind::Line | FieldKind::Text => self.text(field).map(|text| EditBuffer {
                target: EditTarget::Field(field),
                text: text.to_string(),
            }),
            FieldKind::List => self.list(field).and_then(|list| {
                let idx = list.selected()?;
                Some(EditBuffer {
                    target: EditTarget::ListEntry(field, idx),
                    text: list.selected_entry()?.to_string(),
                })
            }),
            FieldKind::Keys => self.references.current().map(|key| EditBuffer {
                target: EditTarget::ReferenceKey(key.to_string()),
                text: key.to_string(),
            }),
        };
        self.edit = buffer;
    }

    fn add(&mut self) {
        let Some(field) = self.focused() else {
            return;
        };
        match field.kind() {
            FieldKind::Keys => {
                self.references.add();
            }
            FieldKind::List => {
                if let Some(list) = self.list_mut(field) {
                    let idx = list.push(String::new());
                    self.edit = Some(EditBuffer {
                        target: EditTarget::ListEntry(field, idx),
                        text: String::new(),
                    });
                }
            }
            FieldKind::Line | FieldKind::Text => {}
        }
    }

    fn remove(&mut self) {
        let Some(field) = self.focused() else {
            return;
        };
        match field.kind() {
            FieldKind::Keys => {
                if let Some(key) = self.references.current().map(str::to_string) {
                    self.references.remove(&key);
                }
            }
            FieldKind::List => {
                if let Some(list) = self.list_mut(field) {
                    list.remove_selected();
                }
            }
            FieldKind::Line | FieldKind::Text => {}
        }
    }
}
