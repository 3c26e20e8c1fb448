//! Turning raw model text into typed results.
//!
//! Structured responses must be a JSON object. The whole trimmed text is
//! parsed first; if that fails, a fenced ```json block is tried, since some
//! models wrap their answer despite JSON mode. Anything else is a
//! response-parse failure. Syntactically valid JSON that lacks a required key,
//! or carries one with the wrong type, is rejected as a schema mismatch.

use everglen_core::{ExtractedCharacter, PlotHoleReport, StoryOutline};
use everglen_error::{ResponseParseError, ResponseParseErrorKind};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{error, warn};

/// Parse a structured response into `T`.
///
/// # Errors
///
/// `InvalidJson` if no JSON can be read, `SchemaMismatch` if the JSON does not
/// have the shape of `T`.
///
/// # Examples
///
/// ```
/// use everglen_core::StoryOutline;
/// use everglen_narrative::interpret::parse_structured;
///
/// let outline: StoryOutline =
///     parse_structured(r#"{"title": "T", "characters": ["A"], "plot": "P"}"#).unwrap();
/// assert_eq!(outline.title, "T");
///
/// assert!(parse_structured::<StoryOutline>("not json").is_err());
/// ```
pub fn parse_structured<T>(text: &str) -> Result<T, ResponseParseError>
where
    T: DeserializeOwned,
{
    let value = parse_value(text)?;
    serde_json::from_value(value).map_err(|e| {
        error!(error = %e, "Structured response does not match the expected schema");
        ResponseParseError::new(ResponseParseErrorKind::SchemaMismatch(e.to_string()))
    })
}

/// Parse a story outline.
///
/// A blank `title` or `plot` is a schema mismatch: both feed later calls.
pub fn story_outline(text: &str) -> Result<StoryOutline, ResponseParseError> {
    let outline: StoryOutline = parse_structured(text)?;
    for (key, value) in [("title", &outline.title), ("plot", &outline.plot)] {
        if value.trim().is_empty() {
            error!(key, "Story outline has a blank required key");
            return Err(ResponseParseError::new(
                ResponseParseErrorKind::SchemaMismatch(format!("'{}' is blank", key)),
            ));
        }
    }
    Ok(outline)
}

#[derive(Deserialize)]
struct CharacterRoster {
    characters: Vec<ExtractedCharacter>,
}

/// Parse a `{characters: [...]}` extraction result.
pub fn extracted_characters(text: &str) -> Result<Vec<ExtractedCharacter>, ResponseParseError> {
    parse_structured::<CharacterRoster>(text).map(|roster| roster.characters)
}

/// Parse a `{plot_holes: [...]}` report.
pub fn plot_holes(text: &str) -> Result<Vec<String>, ResponseParseError> {
    parse_structured::<PlotHoleReport>(text).map(|report| report.plot_holes)
}

/// Free-text responses pass through untouched.
pub fn free_text(text: String) -> String {
    text
}

fn parse_value(text: &str) -> Result<Value, ResponseParseError> {
    let strict_error = match serde_json::from_str::<Value>(text.trim()) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    if let Some(fenced) = fenced_json(text) {
        if let Ok(value) = serde_json::from_str::<Value>(fenced) {
            warn!("Structured response was wrapped in a code fence");
            return Ok(value);
        }
    }

    let preview = text.chars().take(100).collect::<String>();
    error!(
        error = %strict_error,
        response_preview = %preview,
        "Structured response is not valid JSON"
    );
    Err(ResponseParseError::new(ResponseParseErrorKind::InvalidJson(format!(
        "{} (response: {}...)",
        strict_error, preview
    ))))
}

/// Content of the first ```json fence, or of a bare ``` fence.
fn fenced_json(text: &str) -> Option<&str> {
    let (content_start, body) = if let Some(start) = text.find("```json") {
        let from = start + "```json".len();
        (from, &text[from..])
    } else {
        let start = text.find("```")?;
        let from = start + 3;
        let skip = text[from..].find('\n').map(|n| n + 1).unwrap_or(0);
        (from + skip, &text[from + skip..])
    };

    let end = body.find("```")?;
    Some(text[content_start..content_start + end].trim())
}
