//! Response Parser: turns one analysis completion into displayable sections.
//!
//! Two paths:
//! - `parse_structured`: the JSON payload requested by the structured prompt.
//! - `parse_legacy`: the prose contract (ATS markers + `<Label> Score: N%` lines).
//!
//! `parse_completion` tries the first and falls back to the second. Neither
//! path ever fails: text the model mangled still comes back as general
//! feedback, with every missing score marked `Unavailable`.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::llm_client::strip_json_fences;

pub const ATS_START_MARKER: &str = "## ATS ASSESSMENT START";
pub const ATS_END_MARKER: &str = "## ATS ASSESSMENT END";

// ────────────────────────────────────────────────────────────────────────────
// Scores
// ────────────────────────────────────────────────────────────────────────────

/// The fixed score labels, in canonical display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreLabel {
    Clarity,
    Impact,
    Ats,
    KeywordMatch,
}

impl ScoreLabel {
    pub const ALL: [ScoreLabel; 4] = [
        ScoreLabel::Clarity,
        ScoreLabel::Impact,
        ScoreLabel::Ats,
        ScoreLabel::KeywordMatch,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ScoreLabel::Clarity => "Clarity",
            ScoreLabel::Impact => "Impact",
            ScoreLabel::Ats => "ATS",
            ScoreLabel::KeywordMatch => "Keyword Match",
        }
    }

    /// The exact line prefix the prompt asks for. ATS carries a double colon.
    pub fn line_prefix(self) -> &'static str {
        match self {
            ScoreLabel::Clarity => "Clarity Score:",
            ScoreLabel::Impact => "Impact Score:",
            ScoreLabel::Ats => "ATS Score::",
            ScoreLabel::KeywordMatch => "Keyword Match Score:",
        }
    }

    fn index(self) -> usize {
        match self {
            ScoreLabel::Clarity => 0,
            ScoreLabel::Impact => 1,
            ScoreLabel::Ats => 2,
            ScoreLabel::KeywordMatch => 3,
        }
    }

    /// Matches `<Label> Score:` or `<Label> Score::`, optional bold markers
    /// around the colon or the value, then a signed integer and `%`. Out-of-range values still match here so
    /// their lines get stripped; range is checked by the caller.
    fn pattern(self) -> &'static Regex {
        static PATTERNS: OnceLock<[Regex; 4]> = OnceLock::new();
        let patterns = PATTERNS.get_or_init(|| {
            ScoreLabel::ALL.map(|label| {
                Regex::new(&format!(
                    r"{} Score::?(?:\*\*)?[ \t]*(?:\*\*)?(-?\d+)[ \t]*%",
                    regex::escape(label.as_str())
                ))
                .expect("score pattern is a valid regex")
            })
        });
        &patterns[self.index()]
    }
}

impl fmt::Display for ScoreLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single percentage score, or the explicit "could not extract" state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Score {
    Percent(u8),
    #[default]
    Unavailable,
}

impl Score {
    /// Accepts only 0..=100; anything else is unavailable.
    pub fn from_percent(value: i64) -> Self {
        match u8::try_from(value) {
            Ok(v) if v <= 100 => Score::Percent(v),
            _ => Score::Unavailable,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Score::Percent(_))
    }

    pub fn percent(&self) -> Option<u8> {
        match self {
            Score::Percent(v) => Some(*v),
            Score::Unavailable => None,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Percent(v) => write!(f, "{v}%"),
            Score::Unavailable => f.write_str("N/A"),
        }
    }
}

impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// All four scores. Every label is always present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scores([Score; 4]);

impl Scores {
    pub fn get(&self, label: ScoreLabel) -> Score {
        self.0[label.index()]
    }

    pub fn set(&mut self, label: ScoreLabel, score: Score) {
        self.0[label.index()] = score;
    }

    /// Iterates in canonical display order.
    pub fn iter(&self) -> impl Iterator<Item = (ScoreLabel, Score)> + '_ {
        ScoreLabel::ALL.into_iter().map(|label| (label, self.get(label)))
    }

    pub fn missing(&self) -> Vec<ScoreLabel> {
        self.iter()
            .filter(|(_, score)| !score.is_available())
            .map(|(label, _)| label)
            .collect()
    }
}

#[derive(Serialize)]
struct ScoreEntry {
    label: &'static str,
    value: Score,
    percent: Option<u8>,
}

impl Serialize for Scores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(|(label, value)| ScoreEntry {
            label: label.as_str(),
            value,
            percent: value.percent(),
        }))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Parsed analysis
// ────────────────────────────────────────────────────────────────────────────

/// Which parse path produced a `ParsedAnalysis`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseSource {
    Structured,
    Legacy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAnalysis {
    pub general_section: String,
    pub ats_section: String,
    pub scores: Scores,
    pub source: ParseSource,
}

impl ParsedAnalysis {
    /// True when the completion did not follow the requested shape at all.
    pub fn is_degraded(&self) -> bool {
        self.ats_section.is_empty() && self.scores.iter().all(|(_, s)| !s.is_available())
    }
}

/// Parses an analysis completion, preferring the structured payload.
pub fn parse_completion(raw: &str) -> ParsedAnalysis {
    parse_structured(raw).unwrap_or_else(|| parse_legacy(raw))
}

/// Best-effort parse of the prose contract.
pub fn parse_legacy(raw: &str) -> ParsedAnalysis {
    let (general, ats_section) = excise_ats_block(raw);

    let mut scores = Scores::default();
    for label in ScoreLabel::ALL {
        scores.set(label, find_score(raw, label));
    }

    ParsedAnalysis {
        general_section: strip_score_lines(&general).trim().to_string(),
        ats_section,
        scores,
        source: ParseSource::Legacy,
    }
}

/// Splits the ATS block out of `raw`, markers included.
/// Returns `(raw, "")` when either marker is missing or they are out of order.
fn excise_ats_block(raw: &str) -> (String, String) {
    let (Some(start), Some(end)) = (raw.find(ATS_START_MARKER), raw.find(ATS_END_MARKER)) else {
        return (raw.to_string(), String::new());
    };
    if end <= start {
        return (raw.to_string(), String::new());
    }

    let block_end = end + ATS_END_MARKER.len();
    let general = format!("{}{}", &raw[..start], &raw[block_end..]);
    (general, raw[start..block_end].to_string())
}

/// First in-range value for `label` anywhere in `text`.
fn find_score(text: &str, label: ScoreLabel) -> Score {
    label
        .pattern()
        .captures_iter(text)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<i64>().ok())
        .map(Score::from_percent)
        .find(Score::is_available)
        .unwrap_or(Score::Unavailable)
}

/// Drops every whole line that contains a score pattern.
fn strip_score_lines(text: &str) -> String {
    text.split_inclusive('\n')
        .filter(|line| !ScoreLabel::ALL.iter().any(|l| l.pattern().is_match(line)))
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Structured payload
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct StructuredPayload {
    general: String,
    #[serde(default)]
    ats: Option<String>,
    #[serde(default)]
    scores: StructuredScores,
}

#[derive(Debug, Default, Deserialize)]
struct StructuredScores {
    #[serde(default)]
    clarity: Option<Value>,
    #[serde(default)]
    impact: Option<Value>,
    #[serde(default)]
    ats: Option<Value>,
    #[serde(default)]
    keyword_match: Option<Value>,
}

/// Parses the JSON payload. `None` means "not a structured response".
pub fn parse_structured(raw: &str) -> Option<ParsedAnalysis> {
    let body = strip_json_fences(raw);
    if !body.starts_with('{') {
        return None;
    }
    let payload: StructuredPayload = serde_json::from_str(body).ok()?;

    let mut scores = Scores::default();
    scores.set(ScoreLabel::Clarity, structured_score(payload.scores.clarity.as_ref()));
    scores.set(ScoreLabel::Impact, structured_score(payload.scores.impact.as_ref()));
    scores.set(ScoreLabel::Ats, structured_score(payload.scores.ats.as_ref()));
    scores.set(
        ScoreLabel::KeywordMatch,
        structured_score(payload.scores.keyword_match.as_ref()),
    );

    // Same guarantees as the prose path: no markers or score lines in general.
    let (general, _) = excise_ats_block(&payload.general);

    Some(ParsedAnalysis {
        general_section: strip_score_lines(&general).trim().to_string(),
        ats_section: payload.ats.unwrap_or_default().trim().to_string(),
        scores,
        source: ParseSource::Structured,
    })
}

/// Accepts `83`, `83.0` or `"83%"`.
fn structured_score(value: Option<&Value>) -> Score {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .map(Score::from_percent)
            .unwrap_or(Score::Unavailable),
        Some(Value::String(s)) => s
            .trim()
            .trim_end_matches('%')
            .trim()
            .parse::<i64>()
            .map(Score::from_percent)
            .unwrap_or(Score::Unavailable),
        _ => Score::Unavailable,
    }
}
