//! Best-effort public profile scraper.
//!
//! Profile sites actively block automated access and most pages need a
//! login, so this is an optional convenience only: one GET, a fixed list of
//! selectors per section, and a descriptive error whenever that is not enough.

use reqwest::{header, Client, StatusCode, Url};
use scraper::{Html, Selector};
use serde::Serialize;
use tracing::{debug, warn};

use crate::errors::AppError;

pub const SCRAPE_WARNING: &str = "Profile sites actively prevent automated scraping. Most \
    profiles require authentication and some are private or restricted. For best results, \
    copy and paste your profile sections manually.";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const ABOUT_SELECTORS: &[&str] = &[
    "section.summary",
    "section.about",
    "div[data-section=\"summary\"]",
    "div[data-section=\"about\"]",
    "div[class*=\"summary\"]",
    "div[class*=\"about\"]",
];

const EXPERIENCE_SELECTORS: &[&str] = &[
    "section#experience",
    "section.experience",
    "div[data-section=\"experience\"]",
    "div[class*=\"experience\"]",
];

const SKILLS_SELECTORS: &[&str] = &[
    "section#skills",
    "section.skills",
    "div[data-section=\"skills\"]",
    "div[class*=\"skills\"]",
];

/// The sections a scrape can recover. Empty strings mean "not found".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScrapedProfile {
    pub about: String,
    pub experience: String,
    pub skills: String,
}

impl ScrapedProfile {
    /// Formats the found sections the same way manual entry is formatted.
    pub fn to_profile_text(&self) -> Option<String> {
        let mut text = String::new();
        if !self.about.is_empty() {
            text.push_str(&format!("# ABOUT ME\n{}\n\n", self.about));
        }
        if !self.experience.is_empty() {
            text.push_str(&format!("# EXPERIENCE\n{}\n\n", self.experience));
        }
        if !self.skills.is_empty() {
            text.push_str(&format!("# SKILLS\n{}", self.skills));
        }

        let text = text.trim_end().to_string();
        (!text.is_empty()).then_some(text)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScrapeResult {
    pub url: String,
    pub sections: ScrapedProfile,
    pub profile_text: String,
    pub warning: &'static str,
}

#[derive(Clone)]
pub struct ProfileScraper {
    client: Client,
}

impl ProfileScraper {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub async fn scrape(&self, raw_url: &str) -> Result<ScrapeResult, AppError> {
        let url = normalize_profile_url(raw_url)?;
        debug!("Scraping profile {url}");

        let response = self
            .client
            .get(url.clone())
            .header(header::USER_AGENT, USER_AGENT)
            .header(
                header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.5")
            .send()
            .await
            .map_err(|e| {
                AppError::Scrape(format!(
                    "Network Error: {e}. Please check your internet connection and try again."
                ))
            })?;

        let status = response.status();
        if is_blocked(status) {
            warn!("Profile scrape blocked with status {status}");
            return Err(AppError::Scrape(format!(
                "The site is blocking automated access (status {}). Please copy and paste \
                your profile sections manually.",
                status.as_u16()
            )));
        }
        if status != StatusCode::OK {
            return Err(AppError::Scrape(format!(
                "Could not access the profile. Status code: {}. Please try copying and \
                pasting your profile sections manually.",
                status.as_u16()
            )));
        }

        let html = response.text().await.map_err(|e| {
            AppError::Scrape(format!("Network Error: {e}. Please try again."))
        })?;

        let sections = extract_sections(&html);
        let profile_text = sections.to_profile_text().ok_or_else(|| {
            AppError::Scrape(
                "Could not extract profile information. The profile likely requires \
                authentication, is private, or the page structure has changed. Please copy \
                and paste your profile sections manually."
                    .to_string(),
            )
        })?;

        Ok(ScrapeResult {
            url: url.to_string(),
            sections,
            profile_text,
            warning: SCRAPE_WARNING,
        })
    }
}

impl Default for ProfileScraper {
    fn default() -> Self {
        Self::new()
    }
}

/// 999 is LinkedIn's non-standard "request denied".
fn is_blocked(status: StatusCode) -> bool {
    status == StatusCode::FORBIDDEN || status.as_u16() == 999
}

/// Validates the URL and rewrites `linkedin.com/in/<user>` links to the bare
/// public profile form.
pub fn normalize_profile_url(raw: &str) -> Result<Url, AppError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| AppError::Validation(format!("Invalid profile URL: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::Validation(
            "Profile URL must use http or https".to_string(),
        ));
    }

    let is_linkedin = url
        .host_str()
        .is_some_and(|h| h == "linkedin.com" || h.ends_with(".linkedin.com"));
    if !is_linkedin {
        return Ok(url);
    }

    let mut segments = url.path_segments().into_iter().flatten();
    match (segments.next(), segments.next()) {
        (Some("in"), Some(username)) if !username.is_empty() => {
            Url::parse(&format!("https://www.linkedin.com/in/{username}/"))
                .map_err(|e| AppError::Validation(format!("Invalid profile URL: {e}")))
        }
        _ => Ok(url),
    }
}

/// Runs each section's selectors in order and keeps the first hit.
pub fn extract_sections(html: &str) -> ScrapedProfile {
    let document = Html::parse_document(html);
    ScrapedProfile {
        about: first_match(&document, ABOUT_SELECTORS),
        experience: first_match(&document, EXPERIENCE_SELECTORS),
        skills: first_match(&document, SKILLS_SELECTORS),
    }
}

fn first_match(document: &Html, selectors: &[&str]) -> String {
    selectors
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .find_map(|selector| {
            document.select(&selector).next().map(|element| {
                element
                    .text()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
        })
        .unwrap_or_default()
}
