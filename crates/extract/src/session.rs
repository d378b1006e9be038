use ingest::{Heading, SourceContent, section_text};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::config::ExtractionConfig;
use crate::schema::{Entity, EntityDetails, SessionStatus, SessionSummaryDetails};

// "session" must not be the tail of a longer word ("possession 2")
static SESSION_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|[^\p{L}])session[\s_#.\-]*(\d+)").unwrap());
static ORDINAL_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s+").unwrap());
static ISO_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4}-\d{2}-\d{2})\b").unwrap());

fn first_capture(re: &Regex, haystack: &str) -> Option<String> {
    re.captures(haystack)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn parse_session_number(haystack: &str) -> Option<u32> {
    first_capture(&SESSION_NUMBER_RE, haystack).and_then(|n| n.parse().ok())
}

/// Session number from the filename, else from a "session N" phrase in the text.
/// Numbers too large for a `u32` are ignored.
pub fn session_number(filename: &str, text: &str) -> Option<u32> {
    parse_session_number(filename).or_else(|| parse_session_number(text))
}

fn session_date(filename: &str, text: &str) -> Option<String> {
    first_capture(&ISO_DATE_RE, filename).or_else(|| first_capture(&ISO_DATE_RE, text))
}

fn session_title(headings: &[Heading], number: u32) -> String {
    headings
        .iter()
        .find(|h| h.level <= 2)
        .map(|h| ORDINAL_PREFIX_RE.replace(h.text.trim(), "").trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| format!("Session {}", number))
}

fn synopsis(content: &SourceContent, max_chars: usize) -> Option<String> {
    let idx = content
        .headings
        .iter()
        .position(|h| h.text.to_lowercase().contains("synopsis"))?;
    let next = content.headings.get(idx + 1);

    section_text(&content.plain_text, &content.headings[idx], next)
        .map(|body| body.chars().take(max_chars).collect())
}

/// Build the session-summary entity for a document, or `None` when no session
/// number can be found.
pub fn extract_session(content: &SourceContent, config: &ExtractionConfig) -> Option<Entity> {
    let Some(number) = session_number(&content.filename, &content.plain_text) else {
        debug!(file = %content.filename, "No session number found");
        return None;
    };

    let details = SessionSummaryDetails {
        session_number: Some(number),
        date: session_date(&content.filename, &content.plain_text),
        status: Some(SessionStatus::Complete),
        synopsis: synopsis(content, config.synopsis_max_chars),
        summary: Some(content.raw_text.clone()),
    };

    Entity::new(
        &session_title(&content.headings, number),
        EntityDetails::SessionSummary(details),
    )
}
