//! Reference map editor.
//!
//! A list of unique keys plus one shared detail form bound to the selected
//! key. The form is scratch space: it is written back into the map before the
//! selection changes, before a rename, and whenever the document is read.

use super::fields::{FieldId, ListField};
use crate::document::Reference;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

/// Why a key rename was refused. The map is unchanged in every case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenameError {
    #[error("Reference key cannot be empty.")]
    Empty,
    #[error("The reference key '{0}' already exists.")]
    Duplicate(String),
    #[error("No reference is selected.")]
    NoSelection,
}

impl RenameError {
    /// Short title for the warning dialog.
    pub fn title(&self) -> &'static str {
        match self {
            RenameError::Empty => "Invalid name",
            RenameError::Duplicate(_) => "Duplicate key",
            RenameError::NoSelection => "No selection",
        }
    }
}

fn ref_key_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^ref_(\d+)$").ok())
        .as_ref()
}

/// `ref_<max+1>` over keys shaped `ref_<integer>`; other keys are ignored.
/// An index with no successor is ignored too, and a key that is still taken
/// falls back to the lowest free `ref_<n>`.
pub fn next_reference_key<'a>(keys: impl IntoIterator<Item = &'a str>) -> String {
    let keys: Vec<&str> = keys.into_iter().collect();
    let next = keys
        .iter()
        .filter_map(|k| ref_key_pattern()?.captures(k))
        .filter_map(|c| c.get(1).and_then(|m| m.as_str().parse::<u64>().ok()))
        .filter_map(|n| n.checked_add(1))
        .max()
        .unwrap_or(1);

    let taken = |n: u64| keys.contains(&format!("ref_{}", n).as_str());
    let n = if taken(next) {
        (1..).find(|n| !taken(*n)).unwrap_or(next)
    } else {
        next
    };
    format!("ref_{}", n)
}

/// Editable copy of one reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceForm {
    pub bibtex: String,
    pub abstract_text: String,
    pub methodological_category: String,
    pub central_technical_idea: String,
    pub author_reported_strengths: ListField,
    pub reported_limitations: ListField,
    pub relevance_to_our_work: String,
    pub introduction_paragraph_role: String,
}

impl ReferenceForm {
    pub fn from_reference(reference: &Reference) -> Self {
        Self {
            bibtex: reference.bibtex.clone(),
            abstract_text: reference.abstract_text.clone(),
            methodological_category: reference.methodological_category.clone(),
            central_technical_idea: reference.central_technical_idea.clone(),
            author_reported_strengths: ListField::from_values(
                reference.author_reported_strengths.clone(),
            ),
            reported_limitations: ListField::from_values(reference.reported_limitations.clone()),
            relevance_to_our_work: reference.relevance_to_our_work.clone(),
            introduction_paragraph_role: reference.introduction_paragraph_role.clone(),
        }
    }

    /// Trimmed reference as stored in the document.
    pub fn to_reference(&self) -> Reference {
        Reference {
            bibtex: self.bibtex.trim().to_string(),
            abstract_text: self.abstract_text.trim().to_string(),
            methodological_category: self.methodological_category.trim().to_string(),
            central_technical_idea: self.central_technical_idea.trim().to_string(),
            author_reported_strengths: self.author_reported_strengths.values(),
            reported_limitations: self.reported_limitations.values(),
            relevance_to_our_work: self.relevance_to_our_work.trim().to_string(),
            introduction_paragraph_role: self.introduction_paragraph_role.trim().to_string(),
        }
    }

    pub fn text(&self, field: FieldId) -> Option<&str> {
        let text = match field {
            FieldId::RefBibtex => &self.bibtex,
            FieldId::RefAbstract => &self.abstract_text,
            FieldId::RefCategory => &self.methodological_category,
            FieldId::RefIdea => &self.central_technical_idea,
            FieldId::RefRelevance => &self.relevance_to_our_work,
            FieldId::RefRole => &self.introduction_paragraph_role,
            _ => return None,
        };
        Some(text)
    }

    pub fn text_mut(&mut self, field: FieldId) -> Option<&mut String> {
        let text = match field {
            FieldId::RefBibtex => &mut self.bibtex,
            FieldId::RefAbstract => &mut self.abstract_text,
            FieldId::RefCategory => &mut self.methodological_category,
            FieldId::RefIdea => &mut self.central_technical_idea,
            FieldId::RefRelevance => &mut self.relevance_to_our_work,
            FieldId::RefRole => &mut self.introduction_paragraph_role,
            _ => return None,
        };
        Some(text)
    }

    pub fn list(&self, field: FieldId) -> Option<&ListField> {
        match field {
            FieldId::RefStrengths => Some(&self.author_reported_strengths),
            FieldId::RefLimitations => Some(&self.reported_limitations),
            _ => None,
        }
    }

    pub fn list_mut(&mut self, field: FieldId) -> Option<&mut ListField> {
        match field {
            FieldId::RefStrengths => Some(&mut self.author_reported_strengths),
            FieldId::RefLimitations => Some(&mut self.reported_limitations),
            _ => None,
        }
    }
}

/// Reference map with a display order and one selected key.
#[derive(Debug, Clone, Default)]
pub struct ReferencesEditor {
    references: BTreeMap<String, Reference>,
    order: Vec<String>,
    current: Option<String>,
    form: ReferenceForm,
}

impl ReferencesEditor {
    /// Editor over `references`, with the first key selected.
    pub fn from_map(references: BTreeMap<String, Reference>) -> Self {
        let order: Vec<String> = references.keys().cloned().collect();
        let mut editor = Self {
            references,
            order,
            current: None,
            form: ReferenceForm::default(),
        };
        if let Some(first) = editor.order.first().cloned() {
            editor.select(&first);
        }
        editor
    }

    /// Keys in display order.
    pub fn keys(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn form(&self) -> &ReferenceForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ReferenceForm {
        &mut self.form
    }

    /// Stored value for `key`, excluding uncommitted form edits.
    pub fn stored(&self, key: &str) -> Option<&Reference> {
        self.references.get(key)
    }

    /// Write the detail form back into the map under the selected key.
    pub fn commit(&mut self) {
        if let Some(key) = &self.current {
            self.references.insert(key.clone(), self.form.to_reference());
        }
    }

    /// Flush the current form, then load `key` into it.
    pub fn select(&mut self, key: &str) -> bool {
        if !self.references.contains_key(key) {
            return false;
        }
        if self.current.as_deref() == Some(key) {
            return true;
        }
        self.commit();
        let reference = self.references.get(key).cloned().unwrap_or_default();
        self.form = ReferenceForm::from_reference(&reference);
        self.current = Some(key.to_string());
        debug!(key = %key, "Selected reference");
        true
    }

    pub fn select_next(&mut self) {
        let next = match self.current_index() {
            Some(i) => self.order.get(i + 1).cloned(),
            None => self.order.first().cloned(),
        };
        if let Some(key) = next {
            self.select(&key);
        }
    }

    pub fn select_prev(&mut self) {
        let prev = match self.current_index() {
            Some(i) if i > 0 => self.order.get(i - 1).cloned(),
            Some(_) => None,
            None => self.order.first().cloned(),
        };
        if let Some(key) = prev {
            self.select(&key);
        }
    }

    fn current_index(&self) -> Option<usize> {
        let current = self.current.as_deref()?;
        self.order.iter().position(|k| k == current)
    }

    /// Add an empty reference under a fresh `ref_<n>` key and select it.
    pub fn add(&mut self) -> String {
        let key = next_reference_key(self.references.keys().map(String::as_str));
        self.commit();
        self.references.insert(key.clone(), Reference::default());
        self.order.push(key.clone());
        self.form = ReferenceForm::default();
        self.current = Some(key.clone());
        debug!(key = %key, "Added reference");
        key
    }

    /// Delete `key`; clears the form and selection if it was selected.
    pub fn remove(&mut self, key: &str) -> Option<Reference> {
        let removed = self.references.remove(key)?;
        self.order.retain(|k| k != key);
        if self.current.as_deref() == Some(key) {
            self.current = None;
            self.form = ReferenceForm::default();
        }
        debug!(key = %key, "Removed reference");
        Some(removed)
    }

    /// Rename the selected key. Returns the new key.
    pub fn rename(&mut self, new_key: &str) -> Result<String, RenameError> {
        let old_key = self.current.clone().ok_or(RenameError::NoSelection)?;
        let new_key = new_key.trim();
        if new_key.is_empty() {
            return Err(RenameError::Empty);
        }
        if new_key == old_key {
            return Ok(old_key);
        }
        if self.references.contains_key(new_key) {
            return Err(RenameError::Duplicate(new_key.to_string()));
        }

        self.commit();
        let value = self.references.remove(&old_key).unwrap_or_default();
        self.references.insert(new_key.to_string(), value);
        for key in self.order.iter_mut().filter(|k| **k == old_key) {
            *key = new_key.to_string();
        }
        self.current = Some(new_key.to_string());
        debug!(old = %old_key, new = %new_key, "Renamed reference");
        Ok(new_key.to_string())
    }

    /// Flush the form and return a copy of the whole map.
    pub fn to_map(&mut self) -> BTreeMap<String, Reference> {
        self.commit();
        self.references.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn editor_with(keys: &[&str]) -> ReferencesEditor {
        let map = keys
            .iter()
            .map(|k| {
                (
                    k.to_string(),
                    Reference {
                        bibtex: format!("@misc{{{}}}", k),
                        ..Default::default()
                    },
                )
            })
            .collect();
        ReferencesEditor::from_map(map)
    }

    #[test]
    fn test_next_key_skips_foreign_keys() {
        assert_eq!(next_reference_key(["ref_2", "ref_5", "note"]), "ref_6");
        assert_eq!(next_reference_key(Vec::<&str>::new()), "ref_1");
        assert_eq!(next_reference_key(["note", "ref_x", "ref_", "my_ref_9"]), "ref_1");
        assert_eq!(next_reference_key(["ref_10", "ref_9"]), "ref_11");
    }

    #[test]
    fn test_key_allocation_never_reuses_largest_index() {
        let max = format!("ref_{}", u64::MAX);
        let below = format!("ref_{}", u64::MAX - 1);
        assert_eq!(next_reference_key([max.as_str()]), "ref_1");
        assert_eq!(next_reference_key([max.as_str(), below.as_str(), "ref_1"]), "ref_2");

        let mut references = BTreeMap::new();
        references.insert(
            max.clone(),
            Reference {
                bibtex: "@kept".to_string(),
                ..Default::default()
            },
        );
        let mut editor = ReferencesEditor::from_map(references);
        let key = editor.add();
        assert_ne!(key, max);
        assert_eq!(editor.stored(&max).map(|r| r.bibtex.as_str()), Some("@kept"));
    }

    #[test]
    fn test_add_selects_fresh_empty_reference() {
        let mut editor = editor_with(&["ref_2", "ref_5", "note"]);
        let key = editor.add();
        assert_eq!(key, "ref_6");
        assert_eq!(editor.current(), Some("ref_6"));
        assert_eq!(editor.form(), &ReferenceForm::default());
        assert_eq!(editor.keys().last().map(String::as_str), Some("ref_6"));
        assert_eq!(editor.stored("ref_6"), Some(&Reference::default()));
    }

    #[test]
    fn test_switching_selection_flushes_form() {
        let mut editor = editor_with(&["ref_1", "ref_2"]);
        assert_eq!(editor.current(), Some("ref_1"));
        editor.form_mut().introduction_paragraph_role = " foundational ".to_string();
        editor.form_mut().reported_limitations.push("slow");

        assert!(editor.select("ref_2"));
        assert_eq!(editor.form().bibtex, "@misc{ref_2}");

        let stored = editor.stored("ref_1").cloned().unwrap_or_default();
        assert_eq!(stored.introduction_paragraph_role, "foundational");
        assert_eq!(stored.reported_limitations, vec!["slow".to_string()]);
    }

    #[test]
    fn test_select_unknown_key_keeps_state() {
        let mut editor = editor_with(&["ref_1"]);
        assert!(!editor.select("missing"));
        assert_eq!(editor.current(), Some("ref_1"));
    }

    #[test]
    fn test_remove_current_clears_panel() {
        let mut editor = editor_with(&["ref_1", "ref_2"]);
        editor.form_mut().abstract_text = "scratch".to_string();
        assert!(editor.remove("ref_1").is_some());
        assert_eq!(editor.current(), None);
        assert_eq!(editor.form(), &ReferenceForm::default());
        assert_eq!(editor.keys(), &["ref_2".to_string()]);
        assert!(editor.remove("ref_1").is_none());
    }

    #[test]
    fn test_remove_other_keeps_selection() {
        let mut editor = editor_with(&["ref_1", "ref_2"]);
        editor.form_mut().abstract_text = "kept".to_string();
        editor.remove("ref_2");
        assert_eq!(editor.current(), Some("ref_1"));
        assert_eq!(editor.form().abstract_text, "kept");
    }

    #[test]
    fn test_rename_to_existing_key_is_rejected() {
        let mut editor = editor_with(&["ref_1", "ref_2"]);
        let before = editor.to_map();

        assert_eq!(
            editor.rename("ref_2"),
            Err(RenameError::Duplicate("ref_2".to_string()))
        );
        assert_eq!(editor.rename("   "), Err(RenameError::Empty));
        assert_eq!(editor.current(), Some("ref_1"));
        assert_eq!(editor.to_map(), before);
    }

    #[test]
    fn test_rename_moves_value_and_selection() {
        let mut editor = editor_with(&["ref_1", "ref_2"]);
        editor.form_mut().central_technical_idea = "attention".to_string();

        assert_eq!(editor.rename(" vaswani2017 "), Ok("vaswani2017".to_string()));
        assert_eq!(editor.current(), Some("vaswani2017"));
        assert_eq!(
            editor.keys(),
            &["vaswani2017".to_string(), "ref_2".to_string()]
        );

        let map = editor.to_map();
        assert!(!map.contains_key("ref_1"));
        assert_eq!(map["vaswani2017"].bibtex, "@misc{ref_1}");
        assert_eq!(map["vaswani2017"].central_technical_idea, "attention");
    }

    #[test]
    fn test_rename_without_selection() {
        let mut editor = ReferencesEditor::default();
        assert_eq!(editor.rename("x"), Err(RenameError::NoSelection));
    }

    #[test]
    fn test_select_next_prev() {
        let mut editor = editor_with(&["a", "b", "c"]);
        editor.select_next();
        editor.select_next();
        editor.select_next();
        assert_eq!(editor.current(), Some("c"));
        editor.select_prev();
        assert_eq!(editor.current(), Some("b"));
    }
}
