//! Prompt Builder for profile analysis.
//!
//! The markers and score labels below are the wire contract with the parser:
//! both sides read them from here, so the prompt always asks for exactly the
//! text the parser searches for.

use crate::analysis::parser::{ScoreLabel, ATS_END_MARKER, ATS_START_MARKER};
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

pub const ANALYSIS_MAX_TOKENS: u32 = 2500;

pub const ANALYSIS_SYSTEM: &str = "You are an expert LinkedIn profile and resume reviewer \
    with years of experience in HR and recruitment. Provide comprehensive, structured, and \
    actionable feedback based on the user's input. Ensure the ATS section and score are \
    formatted exactly as requested for parsing.";

const FEEDBACK_SECTIONS: &str = "\
1.  **Overall Impression:** Clarity, conciseness, and professional tone.
2.  **Tone Analysis:** Evaluate the overall tone of the profile/resume.
3.  **Grammar and Language Quality:** Assessment of writing mechanics.
4.  **Action Verbs and Achievements:** Effective use of action verbs and quantifiable achievements.
5.  **Red Flags/Weak Points:** Passive language, vague phrases, areas needing improvement.
6.  **Buzzword Identification:** List any buzzwords or overused phrases.
7.  **Professional Vocabulary:** Assess the use of industry-specific and professional language.
8.  **Specific Improvement Suggestions:** Actionable recommendations for each section.";

/// Builds the prose-contract analysis prompt.
///
/// The profile and job description are substituted verbatim.
pub fn build_analysis_prompt(profile_text: &str, job_description: Option<&str>) -> String {
    let mut prompt = intro(profile_text, job_description);

    prompt.push_str("Provide a detailed analysis covering:\n\n");
    prompt.push_str(FEEDBACK_SECTIONS);
    prompt.push_str("\n\n---\n");
    prompt.push_str(ATS_START_MARKER);
    prompt.push_str(
        "\n\nProvide an evaluation of the content's suitability for Applicant Tracking Systems, \
        focusing on keywords, formatting, and structure. Be detailed in this section.\n\n",
    );
    prompt.push_str(ATS_END_MARKER);
    prompt.push_str("\n---\n\n");

    prompt.push_str(
        "Include numerical scores as percentages (0-100%). Write each score on its own line, \
        exactly in the form shown:\n\n",
    );
    for label in requested_labels(job_description) {
        prompt.push_str(&format!("{} <0-100>%\n", label.line_prefix()));
    }

    prompt.push_str(
        "\nFormat the response with clear markdown headings (e.g., ## Overall Impression) and \
        bullet points where appropriate. Place the scores at the very end of the analysis in a \
        clear list as requested, and keep the two ATS marker lines exactly as written.\n",
    );
    prompt
}

/// Builds the analysis prompt that asks for a JSON payload instead of prose.
pub fn build_structured_analysis_prompt(
    profile_text: &str,
    job_description: Option<&str>,
) -> String {
    let mut prompt = intro(profile_text, job_description);

    prompt.push_str("Provide a detailed analysis covering:\n\n");
    prompt.push_str(FEEDBACK_SECTIONS);
    prompt.push_str(
        r#"

Return a JSON object with this EXACT schema (no extra fields):
{
  "general": "markdown feedback covering the numbered points above",
  "ats": "markdown evaluation of Applicant Tracking System suitability: keywords, formatting, structure",
  "scores": {
    "clarity": 0-100,
    "impact": 0-100,
    "ats": 0-100,
    "keyword_match": 0-100 or null when no job description was provided
  }
}
"#,
    );
    prompt
}

/// System prompt for the structured format.
pub fn structured_analysis_system() -> String {
    format!("{ANALYSIS_SYSTEM} {JSON_ONLY_INSTRUCTION}")
}

fn intro(profile_text: &str, job_description: Option<&str>) -> String {
    let mut prompt = format!(
        "Analyze this LinkedIn profile or resume content and provide professional feedback. \
        Focus on the following aspects:\n\n{profile_text}\n\n"
    );

    if let Some(jd) = job_description {
        prompt.push_str(&format!(
            "Compare this profile content with the following job description and analyze keyword \
            relevance and job fit:\n\nJob Description:\n{jd}\n\n"
        ));
    }
    prompt
}

/// Keyword Match is only meaningful against a job description.
fn requested_labels(job_description: Option<&str>) -> impl Iterator<Item = ScoreLabel> {
    let with_jd = job_description.is_some();
    ScoreLabel::ALL
        .into_iter()
        .filter(move |label| with_jd || *label != ScoreLabel::KeywordMatch)
}
