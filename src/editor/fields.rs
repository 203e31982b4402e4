//! Form field metadata and the string-list field.

/// Text shown in an empty list; never part of the list's value.
pub const LIST_PLACEHOLDER: &str = "Press 'a' to insert a new entry";

/// Every editable field of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    Title,
    Domain,
    TargetJournal,
    Keywords,
    AuthorSummary,
    DomainOverview,
    SpecificProblem,
    PracticalChallenges,
    WhyInsufficient,
    Contributions,
    ReferenceKeys,
    RefBibtex,
    RefAbstract,
    RefCategory,
    RefIdea,
    RefStrengths,
    RefLimitations,
    RefRelevance,
    RefRole,
    CommonTrends,
    OpenProblems,
    ResearchGap,
    WritingGuidelines,
}

/// How a field is edited and drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Single line of text
    Line,
    /// Multi-line text
    Text,
    /// Ordered list of free-text entries
    List,
    /// Reference key selector
    Keys,
}

impl FieldId {
    pub fn kind(self) -> FieldKind {
        match self {
            FieldId::Title
            | FieldId::Domain
            | FieldId::TargetJournal
            | FieldId::RefCategory
            | FieldId::RefRole => FieldKind::Line,
            FieldId::Keywords
            | FieldId::PracticalChallenges
            | FieldId::Contributions
            | FieldId::RefStrengths
            | FieldId::RefLimitations
            | FieldId::CommonTrends
            | FieldId::OpenProblems => FieldKind::List,
            FieldId::ReferenceKeys => FieldKind::Keys,
            _ => FieldKind::Text,
        }
    }

    /// True for the detail fields bound to the selected reference.
    pub fn is_reference_detail(self) -> bool {
        matches!(
            self,
            FieldId::RefBibtex
                | FieldId::RefAbstract
                | FieldId::RefCategory
                | FieldId::RefIdea
                | FieldId::RefStrengths
                | FieldId::RefLimitations
                | FieldId::RefRelevance
                | FieldId::RefRole
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            FieldId::Title => "Title",
            FieldId::Domain => "Domain",
            FieldId::TargetJournal => "Target Journal",
            FieldId::Keywords => "Keywords",
            FieldId::AuthorSummary => "Author Intended Summary",
            FieldId::DomainOverview => "Research Domain Overview",
            FieldId::SpecificProblem => "Specific Problem",
            FieldId::PracticalChallenges => "Practical Challenges",
            FieldId::WhyInsufficient => "Why Existing Solutions Are Insufficient",
            FieldId::Contributions => "Contributions",
            FieldId::ReferenceKeys => "References",
            FieldId::RefBibtex => "BibTeX",
            FieldId::RefAbstract => "Abstract",
            FieldId::RefCategory => "Methodological Category",
            FieldId::RefIdea => "Central Technical Idea",
            FieldId::RefStrengths => "Author Reported Strengths",
            FieldId::RefLimitations => "Reported Limitations",
            FieldId::RefRelevance => "Relevance to Our Work",
            FieldId::RefRole => "Introduction Paragraph Role",
            FieldId::CommonTrends => "Common Trends",
            FieldId::OpenProblems => "Open Problems",
            FieldId::ResearchGap => "Explicit Research Gap",
            FieldId::WritingGuidelines => "Writing Guidelines",
        }
    }

    pub fn tooltip(self) -> &'static str {
        match self {
            FieldId::Title => "Full paper title.",
            FieldId::Domain => "Research domain, e.g., Computer Vision, NLP, Systems.",
            FieldId::TargetJournal => "Intended journal (IEEE, Elsevier, ACM, etc.).",
            FieldId::Keywords => "High-level keywords describing the paper.",
            FieldId::AuthorSummary => {
                "Human-written summary describing what the paper does and why."
            }
            FieldId::DomainOverview => {
                "General overview of the research domain and its importance."
            }
            FieldId::SpecificProblem => "Precise formulation of the problem addressed.",
            FieldId::PracticalChallenges => "Key practical or theoretical challenges.",
            FieldId::WhyInsufficient => {
                "High-level human assessment without citing specific papers."
            }
            FieldId::Contributions => "Main contributions of the paper, one per entry.",
            FieldId::ReferenceKeys => "Reference keys. Enter renames, a adds, d removes.",
            FieldId::RefBibtex => "BibTeX entry. This is the only source for citations.",
            FieldId::RefAbstract => "Original abstract of the cited paper.",
            FieldId::RefCategory => "e.g., deep_learning, transformer_based, graph_based.",
            FieldId::RefIdea => "Main technical idea introduced by this work.",
            FieldId::RefStrengths => "Strengths explicitly claimed by the original authors.",
            FieldId::RefLimitations => "Limitations discussed or implied by the paper.",
            FieldId::RefRelevance => "How this work relates to and differs from our paper.",
            FieldId::RefRole => "foundational, early_state_of_art, recent_advances, etc.",
            FieldId::CommonTrends => "Observed trends across the literature.",
            FieldId::OpenProblems => "Unresolved problems identified by the author.",
            FieldId::ResearchGap => {
                "Clear formulation of the research gap addressed by the paper."
            }
            FieldId::WritingGuidelines => {
                "Explicit instructions to be followed by the LLM when generating text."
            }
        }
    }
}

/// Tabs of the form, in display order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Section {
    #[default]
    PaperProfile,
    ResearchProblem,
    Contributions,
    References,
    Synthesis,
    WritingGuidelines,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::PaperProfile,
        Section::ResearchProblem,
        Section::Contributions,
        Section::References,
        Section::Synthesis,
        Section::WritingGuidelines,
    ];

    /// Top-level tab titles; References and Synthesis share "Related Work".
    pub const TABS: [&'static str; 5] = [
        "Paper Profile",
        "Research Problem",
        "Contributions",
        "Related Work",
        "Writing Guidelines",
    ];

    pub fn title(self) -> &'static str {
        match self {
            Section::PaperProfile => "Paper Profile",
            Section::ResearchProblem => "Research Problem",
            Section::Contributions => "Contributions",
            Section::References => "References",
            Section::Synthesis => "Human Curated Synthesis",
            Section::WritingGuidelines => "Writing Guidelines",
        }
    }

    /// Index into [`Section::TABS`].
    pub fn tab_index(self) -> usize {
        match self {
            Section::PaperProfile => 0,
            Section::ResearchProblem => 1,
            Section::Contributions => 2,
            Section::References | Section::Synthesis => 3,
            Section::WritingGuidelines => 4,
        }
    }

    pub fn is_related_work(self) -> bool {
        matches!(self, Section::References | Section::Synthesis)
    }

    /// All fields of the section, in focus order.
    pub fn fields(self) -> &'static [FieldId] {
        match self {
            Section::PaperProfile => &[
                FieldId::Title,
                FieldId::Domain,
                FieldId::TargetJournal,
                FieldId::Keywords,
                FieldId::AuthorSummary,
            ],
            Section::ResearchProblem => &[
                FieldId::DomainOverview,
                FieldId::SpecificProblem,
                FieldId::PracticalChallenges,
                FieldId::WhyInsufficient,
            ],
            Section::Contributions => &[FieldId::Contributions],
            Section::References => &[
                FieldId::ReferenceKeys,
                FieldId::RefBibtex,
                FieldId::RefAbstract,
                FieldId::RefCategory,
                FieldId::RefIdea,
                FieldId::RefStrengths,
                FieldId::RefLimitations,
                FieldId::RefRelevance,
                FieldId::RefRole,
            ],
            Section::Synthesis => &[
                FieldId::CommonTrends,
                FieldId::OpenProblems,
                FieldId::ResearchGap,
            ],
            Section::WritingGuidelines => &[FieldId::WritingGuidelines],
        }
    }

    pub fn next(self) -> Section {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Section {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Ordered list of free-text entries with a selection cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListField {
    entries: Vec<String>,
    selected: Option<usize>,
}

impl ListField {
    pub fn from_values(values: Vec<String>) -> Self {
        let selected = if values.is_empty() { None } else { Some(0) };
        Self {
            entries: values,
            selected,
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_entry(&self) -> Option<&str> {
        self.selected
            .and_then(|i| self.entries.get(i))
            .map(String::as_str)
    }

    /// An empty list shows [`LIST_PLACEHOLDER`] instead of entries.
    pub fn shows_placeholder(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an entry and select it; returns its index.
    pub fn push(&mut self, text: impl Into<String>) -> usize {
        self.entries.push(text.into());
        let idx = self.entries.len() - 1;
        self.selected = Some(idx);
        idx
    }

    pub fn set_entry(&mut self, idx: usize, text: impl Into<String>) -> bool {
        match self.entries.get_mut(idx) {
            Some(entry) => {
                *entry = text.into();
                true
            }
            None => false,
        }
    }

    pub fn remove_selected(&mut self) -> Option<String> {
        let idx = self.selected?;
        if idx >= self.entries.len() {
            self.selected = None;
            return None;
        }
        let removed = self.entries.remove(idx);
        self.selected = if self.entries.is_empty() {
            None
        } else {
            Some(idx.min(self.entries.len() - 1))
        };
        Some(removed)
    }

    pub fn select_next(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) => (i + 1).min(self.entries.len() - 1),
            None => 0,
        });
    }

    pub fn select_prev(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.selected = Some(self.selected.map_or(0, |i| i.saturating_sub(1)));
    }

    /// Trimmed, non-blank entries in order.
    pub fn values(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| e.trim())
            .filter(|e| !e.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_not_a_value() {
        let list = ListField::default();
        assert!(list.shows_placeholder());
        assert!(list.values().is_empty());
        assert_eq!(list.selected(), None);
    }

    #[test]
    fn test_values_drop_blank_entries() {
        let mut list = ListField::default();
        list.push("  first ");
        list.push("   ");
        list.push("second");
        assert_eq!(list.values(), vec!["first".to_string(), "second".to_string()]);
        assert!(!list.shows_placeholder());
    }

    #[test]
    fn test_remove_selected_moves_cursor() {
        let mut list = ListField::from_values(vec!["a".into(), "b".into(), "c".into()]);
        list.select_next();
        list.select_next();
        assert_eq!(list.remove_selected().as_deref(), Some("c"));
        assert_eq!(list.selected_entry(), Some("b"));
        list.remove_selected();
        list.remove_selected();
        assert_eq!(list.selected(), None);
        assert!(list.remove_selected().is_none());
        assert!(list.shows_placeholder());
    }

    #[test]
    fn test_section_cycle() {
        let mut section = Section::PaperProfile;
        for _ in 0..Section::ALL.len() {
            section = section.next();
        }
        assert_eq!(section, Section::PaperProfile);
        assert_eq!(Section::PaperProfile.prev(), Section::WritingGuidelines);
        assert_eq!(Section::Synthesis.tab_index(), Section::References.tab_index());
    }

    #[test]
    fn test_detail_fields_belong_to_references() {
        for field in Section::References.fields().iter().skip(1) {
            assert!(field.is_reference_detail(), "{:?}", field);
        }
        assert_eq!(FieldId::ReferenceKeys.kind(), FieldKind::Keys);
        assert_eq!(FieldId::RefRole.kind(), FieldKind::Line);
        assert_eq!(FieldId::RefStrengths.kind(), FieldKind::List);
    }
}
