// All LLM prompt builders for the Generation module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::NO_PLACEHOLDER_INSTRUCTION;

pub const RESUME_MAX_TOKENS: u32 = 1500;
pub const COVER_LETTER_MAX_TOKENS: u32 = 500;

pub const RESUME_SYSTEM: &str = "You are an expert resume writer. Create a well-formatted, \
    professional resume from the provided sections.";

pub const COVER_LETTER_SYSTEM: &str = "You are an expert cover letter writer. Create a \
    compelling and tailored cover letter.";

const RESUME_FORMAT_INSTRUCTIONS: &str = "\
Format the resume as a professional document using markdown, closely following a standard resume structure.

Include the following sections in this approximate order:
- Name
- Contact Information
- Professional Summary / About Me
- Technical Skills
- Work Experience
- Education
- Projects
- Awards, Honors, Certifications

Use markdown headings (## for main sections) and bullet points (*) for lists within sections (e.g., job responsibilities, project details).
Use markdown horizontal rules (---) to clearly separate each main section.

For the Name, use a level 1 markdown heading (#) with the full name, but do NOT make the name text bold yourself (no ** stars).
For Contact Information, place Phone, Email, LinkedIn, and GitHub on a single line separated by ' | '. Place this line immediately below the Name with minimal vertical space.

Ensure the language is concise, uses action verbs and highlights achievements.
";

/// Resume prompt. `resume_input` is the composed field text; the optional
/// job description tailors the result.
pub fn build_resume_prompt(resume_input: &str, job_description: Option<&str>) -> String {
    let mut prompt = format!(
        "Create a professional resume based on the following profile information:\n\n{resume_input}\n\n"
    );

    if let Some(jd) = job_description {
        prompt.push_str(&format!(
            "Tailor the resume for the following job description:\n\nJob Description:\n{jd}\n\n"
        ));
    }

    prompt.push_str(RESUME_FORMAT_INSTRUCTIONS);
    prompt.push_str(NO_PLACEHOLDER_INSTRUCTION);
    prompt.push('\n');
    prompt
}

/// Cover letter prompt built from the stored profile snapshot.
pub fn build_cover_letter_prompt(profile_text: &str, company_name: &str, job_posting: &str) -> String {
    format!(
        "Write a professional cover letter for a job application.

Use the following profile information:
{profile_text}

Use the following company name and job posting to tailor the letter:
Company Name: {company_name}
Job Posting:
{job_posting}

Address the letter to the hiring manager (use a general title like 'Hiring Manager' if no name is provided). \
Highlight relevant skills and experience from the profile that match the job posting. \
Explain why you are interested in this specific role and company. Keep the letter concise and professional.

Include a professional closing. {NO_PLACEHOLDER_INSTRUCTION}
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_prompt_without_job_description() {
        let prompt = build_resume_prompt("# NAME\nAda", None);
        assert!(prompt.contains("# NAME\nAda"));
        assert!(!prompt.contains("Tailor the resume"));
        assert!(prompt.contains("Awards, Honors, Certifications"));
        assert!(prompt.contains("[Your Name]"));
    }

    #[test]
    fn test_resume_prompt_with_job_description() {
        let prompt = build_resume_prompt("# NAME\nAda", Some("Analytical engine operator"));
        assert!(prompt.contains("Job Description:\nAnalytical engine operator"));
    }

    #[test]
    fn test_cover_letter_prompt_substitutes_fields() {
        let prompt = build_cover_letter_prompt("# SKILLS\nRust", "Acme Corp", "Build things");
        assert!(prompt.contains("Company Name: Acme Corp"));
        assert!(prompt.contains("Job Posting:\nBuild things"));
        assert!(prompt.contains("# SKILLS\nRust"));
        assert!(prompt.contains("Hiring Manager"));
    }
}
