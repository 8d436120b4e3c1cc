// Profile analysis: prompt building, the completion call, and parsing the
// response into the session's analysis group.
// All LLM calls go through llm_client.

pub mod analyzer;
pub mod handlers;
pub mod parser;
pub mod prompts;

/// Which response contract the analysis prompt asks for.
/// The parser accepts either regardless of this setting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnalysisFormat {
    /// ATS marker lines plus `<Label> Score: N%` lines.
    #[default]
    Legacy,
    /// A JSON payload with `general`, `ats` and `scores`.
    Structured,
}
