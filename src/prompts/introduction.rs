//! Introduction drafting prompts.
//!
//! Contains the system and user prompt templates that turn a
//! [`PaperIntroductionDocument`] into a journal-style Introduction section.

use crate::document::PaperIntroductionDocument;
use crate::error::Result;

/// System prompt for introduction drafting
pub const SYSTEM_PROMPT: &str = r#"You are an expert scientific writer who publishes in Q1 Computer Science journals
(e.g., IEEE TPAMI, CVPR, ICCV, NeurIPS, Elsevier Pattern Recognition).

Your task is to write the INTRODUCTION section of a research paper.

Rules you MUST follow:
1. Use only the information contained in the user's JSON input.
2. Do NOT invent citations, methods, datasets, claims, or results.
3. Every statement about prior work must be grounded in the entries of
   related_work.references; the bibtex field is the only citation source.
4. Weave background, state of the art, critical analysis, and motivation
   into one continuous narrative.
5. Match the tone of a top-tier journal: formal, precise, and concise.
6. No bullet points. No section headers. Only well-structured academic paragraphs.
7. Do NOT describe the JSON or its structure in the output.
8. Follow every instruction given in the "writing_guidelines" field, if present.
9. Do not copy sentences from the JSON verbatim; rephrase in your own words.
10. Do not repeat information across paragraphs.

Write as a human researcher, not as an assistant.
"#;

/// User prompt preceding the fenced JSON document
pub const USER_PROMPT: &str = r#"Using the JSON below, write the complete INTRODUCTION section of the paper.

Structural requirements:
- Paragraph 1: General context. Overview of the research domain and why it
  matters (use research_problem.research_domain_overview).
- Paragraph 2: The specific problem addressed and its practical challenges
  (use research_problem.specific_problem and practical_challenges).
- Paragraphs 3-4: Integrated state-of-the-art discussion. Order the cited
  works by their introduction_paragraph_role
  (foundational -> early_state_of_art -> recent_advances) and point out
  their limitations where relevant. Cite with LaTeX-style references taken
  from the bibtex entries.
- Paragraph 5: Synthesis of common trends and open problems
  (use related_work.human_curated_synthesis).
- Final paragraph: State the research gap explicitly and position the
  paper's contributions as the answer to that gap.

Let paper_profile.author_intended_summary guide emphasis and narrative flow.
Integrate the contributions naturally into the motivation, not as a list.
This is a scientific article: keep it concise and clear, with no redundant text.

Here is the JSON input:

"#;

/// The two messages of a chat-completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntroductionPrompt {
    pub system: String,
    pub user: String,
}

/// Pretty JSON of the document as embedded in the prompt.
pub fn document_json(document: &PaperIntroductionDocument) -> Result<String> {
    document.to_json_pretty()
}

/// Build the user prompt around an already serialized document.
pub fn build_user_prompt(document_json: &str) -> String {
    let mut prompt = String::with_capacity(USER_PROMPT.len() + document_json.len() + 16);
    prompt.push_str(USER_PROMPT);
    prompt.push_str("```json\n");
    prompt.push_str(document_json);
    prompt.push_str("\n```");
    prompt
}

/// Build the system and user messages for `document`.
pub fn build(document: &PaperIntroductionDocument) -> Result<IntroductionPrompt> {
    let json = document_json(document)?;
    Ok(IntroductionPrompt {
        system: SYSTEM_PROMPT.to_string(),
        user: build_user_prompt(&json),
    })
}

/// Both prompts as one readable text, for pasting into a chat UI by hand.
pub fn build_text_only(document: &PaperIntroductionDocument) -> Result<String> {
    let prompt = build(document)?;
    let mut text = String::with_capacity(prompt.system.len() + prompt.user.len() + 32);
    text.push_str("System PROMPT:\n");
    text.push_str(&prompt.system);
    text.push('\n');
    text.push_str("User PROMPT:\n");
    text.push_str(&prompt.user);
    Ok(text)
}
