//! Structured results the model is asked to return.

use serde::{Deserialize, Deserializer, Serialize};

/// Outline returned by story generation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoryOutline {
    /// Story title
    pub title: String,
    /// Names of characters appearing in the story
    ///
    /// Informational only. Entries may be bare names or `{"name": ...}`
    /// objects; anything else in the list is skipped.
    #[serde(default, deserialize_with = "cast_names")]
    pub characters: Vec<String>,
    /// Plot summary
    pub plot: String,
}

fn cast_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(serde_json::Value::Array(entries)) = value else {
        return Ok(Vec::new());
    };
    Ok(entries
        .into_iter()
        .filter_map(|entry| match entry {
            serde_json::Value::String(name) => Some(name),
            serde_json::Value::Object(mut fields) => match fields.remove("name") {
                Some(serde_json::Value::String(name)) => Some(name),
                _ => None,
            },
            _ => None,
        })
        .collect())
}

/// A character descriptor recovered from prose.
///
/// Everything except the name is best effort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedCharacter {
    /// Character name
    pub name: String,
    /// Social group
    #[serde(default)]
    pub high_school_clique: Option<String>,
    /// Personality summary
    #[serde(default)]
    pub personality: Option<String>,
    /// Age as the model reported it
    #[serde(default)]
    pub age: Option<serde_json::Value>,
    /// Gender
    #[serde(default)]
    pub gender: Option<String>,
    /// Current job
    #[serde(default)]
    pub current_job: Option<String>,
    /// Anything else
    #[serde(default)]
    pub additional_desc: Option<String>,
}

/// Plot holes found across a series.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlotHoleReport {
    /// One entry per inconsistency
    pub plot_holes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_cast_accepts_names_and_objects() {
        let outline: StoryOutline = serde_json::from_str(
            r#"{"title":"T","characters":["Max",{"name":"Cameron","role":"lead"},7],"plot":"P"}"#,
        )
        .unwrap();
        assert_eq!(outline.characters, vec!["Max", "Cameron"]);
    }

    #[test]
    fn test_outline_cast_of_wrong_type_is_ignored() {
        let outline: StoryOutline =
            serde_json::from_str(r#"{"title":"T","characters":"Max and Cameron","plot":"P"}"#)
                .unwrap();
        assert!(outline.characters.is_empty());

        let outline: StoryOutline =
            serde_json::from_str(r#"{"title":"T","characters":null,"plot":"P"}"#).unwrap();
        assert!(outline.characters.is_empty());
    }
}
