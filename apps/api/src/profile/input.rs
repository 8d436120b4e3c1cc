//! Profile composition from manual fields and uploaded documents.

use serde::Deserialize;

/// Manual profile entry: the three sections pasted from a public profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileFields {
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub skills: String,
}

impl ProfileFields {
    pub fn is_blank(&self) -> bool {
        [&self.about, &self.experience, &self.skills]
            .iter()
            .all(|f| f.trim().is_empty())
    }
}

/// Builds the profile text sent for analysis.
///
/// Manual fields win. Extracted document text is used only when every manual
/// field is blank. Returns `None` when there is nothing to analyze.
pub fn compose_profile(fields: &ProfileFields, document_text: Option<&str>) -> Option<String> {
    if !fields.is_blank() {
        return Some(format!(
            "# ABOUT ME\n{}\n\n# EXPERIENCE\n{}\n\n# SKILLS\n{}",
            fields.about, fields.experience, fields.skills
        ));
    }

    document_text
        .filter(|t| !t.trim().is_empty())
        .map(str::to_string)
}

/// Everything the resume builder collects.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResumeFields {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub projects: String,
    #[serde(default)]
    pub awards: String,
}

impl ResumeFields {
    fn sections(&self) -> [(&'static str, &str); 8] {
        [
            ("NAME", self.name.as_str()),
            ("CONTACT INFORMATION", self.contact.as_str()),
            ("EDUCATION", self.education.as_str()),
            ("ABOUT ME", self.about.as_str()),
            ("EXPERIENCE", self.experience.as_str()),
            ("SKILLS", self.skills.as_str()),
            ("PROJECTS", self.projects.as_str()),
            ("AWARDS, HONORS, CERTIFICATIONS", self.awards.as_str()),
        ]
    }
}

/// Builds the resume input text, or `None` when every field is blank.
pub fn compose_resume_input(fields: &ResumeFields) -> Option<String> {
    let sections = fields.sections();
    if sections.iter().all(|(_, body)| body.trim().is_empty()) {
        return None;
    }

    Some(
        sections
            .iter()
            .map(|(heading, body)| format!("# {heading}\n{body}"))
            .collect::<Vec<_>>()
            .join("\n\n"),
    )
}

/// Trims and drops blank optional text.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_fields_compose_with_headings() {
        let fields = ProfileFields {
            about: "Backend engineer".to_string(),
            experience: "Acme 2019-2024".to_string(),
            skills: "Rust, SQL".to_string(),
        };
        assert_eq!(
            compose_profile(&fields, None).unwrap(),
            "# ABOUT ME\nBackend engineer\n\n# EXPERIENCE\nAcme 2019-2024\n\n# SKILLS\nRust, SQL"
        );
    }

    #[test]
    fn test_manual_fields_win_over_document() {
        let fields = ProfileFields {
            skills: "Go".to_string(),
            ..Default::default()
        };
        let profile = compose_profile(&fields, Some("PDF resume text")).unwrap();
        assert!(profile.contains("# SKILLS\nGo"));
        assert!(!profile.contains("PDF resume text"));
    }

    #[test]
    fn test_document_used_when_manual_fields_blank() {
        let fields = ProfileFields {
            about: "   ".to_string(),
            ..Default::default()
        };
        assert_eq!(
            compose_profile(&fields, Some("PDF resume text")).unwrap(),
            "PDF resume text"
        );
    }

    #[test]
    fn test_nothing_to_analyze() {
        assert!(compose_profile(&ProfileFields::default(), None).is_none());
        assert!(compose_profile(&ProfileFields::default(), Some("\n  \n")).is_none());
    }

    #[test]
    fn test_resume_input_lists_every_section_in_order() {
        let fields = ResumeFields {
            name: "Ada Lovelace".to_string(),
            awards: "Royal Medal".to_string(),
            ..Default::default()
        };
        let input = compose_resume_input(&fields).unwrap();
        assert!(input.starts_with("# NAME\nAda Lovelace\n\n# CONTACT INFORMATION\n"));
        assert!(input.ends_with("# AWARDS, HONORS, CERTIFICATIONS\nRoyal Medal"));
        let name_at = input.find("# NAME").unwrap();
        let projects_at = input.find("# PROJECTS").unwrap();
        assert!(name_at < projects_at);
    }

    #[test]
    fn test_resume_input_requires_some_content() {
        assert!(compose_resume_input(&ResumeFields::default()).is_none());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  jd  ")), Some("jd"));
        assert_eq!(non_blank(Some("  ")), None);
        assert_eq!(non_blank(None), None);
    }
}
