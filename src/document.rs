//! Paper introduction document model.
//!
//! The document is a plain JSON tree describing a paper: its profile, the
//! research problem, claimed contributions, an annotated bibliography with a
//! human-written synthesis, and free-text writing guidelines. Every field is
//! always serialized; missing fields in a file load as empty values.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// Compound suffix marking a file as an introduction document.
pub const DOCUMENT_SUFFIX: &str = ".intro.json";

/// Top-level document sent to the prompt builder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaperIntroductionDocument {
    pub paper_profile: PaperProfile,
    pub research_problem: ResearchProblem,
    pub contributions: Vec<String>,
    pub related_work: RelatedWork,
    pub writing_guidelines: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaperProfile {
    pub title: String,
    pub domain: String,
    pub target_journal: String,
    pub keywords: Vec<String>,
    pub author_intended_summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchProblem {
    pub research_domain_overview: String,
    pub specific_problem: String,
    pub practical_challenges: Vec<String>,
    pub why_existing_solutions_are_insufficient: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelatedWork {
    /// Reference key -> annotated reference. Keys are unique.
    pub references: BTreeMap<String, Reference>,
    pub human_curated_synthesis: HumanCuratedSynthesis,
}

/// One annotated entry of the bibliography.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reference {
    /// BibTeX entry; the only source the model may cite from
    pub bibtex: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub methodological_category: String,
    pub central_technical_idea: String,
    pub author_reported_strengths: Vec<String>,
    pub reported_limitations: Vec<String>,
    pub relevance_to_our_work: String,
    /// Free-form tag: foundational, early_state_of_art, recent_advances, ...
    pub introduction_paragraph_role: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HumanCuratedSynthesis {
    pub common_trends: Vec<String>,
    pub open_problems: Vec<String>,
    pub explicit_research_gap: String,
}

fn has_text(value: &str) -> bool {
    !value.trim().is_empty()
}

fn has_entries(values: &[String]) -> bool {
    values.iter().any(|v| has_text(v))
}

impl Reference {
    /// True when no field carries any non-blank text.
    pub fn is_empty(&self) -> bool {
        ![
            &self.bibtex,
            &self.abstract_text,
            &self.methodological_category,
            &self.central_technical_idea,
            &self.relevance_to_our_work,
            &self.introduction_paragraph_role,
        ]
        .into_iter()
        .any(|s| has_text(s))
            && !has_entries(&self.author_reported_strengths)
            && !has_entries(&self.reported_limitations)
    }
}

impl PaperIntroductionDocument {
    /// True when every string is blank and every list holds only blank entries,
    /// recursively. Reference keys alone do not count as content.
    pub fn is_empty(&self) -> bool {
        let profile = &self.paper_profile;
        let problem = &self.research_problem;
        let synthesis = &self.related_work.human_curated_synthesis;

        let strings = [
            &profile.title,
            &profile.domain,
            &profile.target_journal,
            &profile.author_intended_summary,
            &problem.research_domain_overview,
            &problem.specific_problem,
            &problem.why_existing_solutions_are_insufficient,
            &synthesis.explicit_research_gap,
            &self.writing_guidelines,
        ];
        let lists = [
            &profile.keywords,
            &problem.practical_challenges,
            &self.contributions,
            &synthesis.common_trends,
            &synthesis.open_problems,
        ];

        !strings.into_iter().any(|s| has_text(s))
            && !lists.into_iter().any(|l| has_entries(l))
            && self.related_work.references.values().all(Reference::is_empty)
    }

    /// Parse a document from JSON text.
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Pretty-printed JSON, 2-space indentation, non-ASCII kept as-is.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a document file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let document = Self::from_json_str(&content)?;
        info!(
            path = %path.display(),
            references = document.related_work.references.len(),
            "Loaded document"
        );
        Ok(document)
    }

    /// Save the document, appending [`DOCUMENT_SUFFIX`] when missing.
    /// Returns the path actually written.
    pub fn save(&self, path: &Path) -> Result<PathBuf> {
        let path = with_document_suffix(path);
        let mut content = self.to_json_pretty()?;
        content.push('\n');
        std::fs::write(&path, content)?;
        info!(path = %path.display(), "Saved document");
        Ok(path)
    }
}

/// True when the file name ends with [`DOCUMENT_SUFFIX`].
pub fn has_document_suffix(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.len() > DOCUMENT_SUFFIX.len() && n.ends_with(DOCUMENT_SUFFIX))
}

/// Append [`DOCUMENT_SUFFIX`] unless the path already carries it.
pub fn with_document_suffix(path: &Path) -> PathBuf {
    if has_document_suffix(path) {
        return path.to_path_buf();
    }
    let mut raw = path.as_os_str().to_os_string();
    raw.push(DOCUMENT_SUFFIX);
    PathBuf::from(raw)
}
