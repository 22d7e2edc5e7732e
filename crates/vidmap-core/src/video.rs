//! Video records as delivered by the data source.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Duration used when a record has none, or one that is not a usable number.
pub const DEFAULT_DURATION_SECS: u64 = 126;

/// A single video in the site catalog.
///
/// Every field is optional here; which ones are required depends on the
/// sitemap variant being built. Fields that are empty or whitespace-only are
/// reported as absent by the accessors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    #[serde(default, deserialize_with = "text")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "text")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "text")]
    pub description: Option<String>,

    /// Thumbnail URL or site-relative path.
    #[serde(default, deserialize_with = "text")]
    pub thumbnail: Option<String>,

    /// Embed URL or site-relative path.
    #[serde(default, deserialize_with = "text")]
    pub embed_url: Option<String>,

    /// Length in seconds, as number or numeric string.
    #[serde(default)]
    pub duration: Option<Value>,

    #[serde(default, deserialize_with = "text")]
    pub date_published: Option<String>,

    #[serde(default, deserialize_with = "text")]
    pub date_modified: Option<String>,

    #[serde(default, deserialize_with = "tags")]
    pub tags: Option<Tags>,

    #[serde(default, deserialize_with = "text")]
    pub category: Option<String>,
}

/// Tags either as one comma-separated string or as a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Tags {
    Delimited(String),
    List(Vec<String>),
}

impl Tags {
    /// Individual tags, trimmed, with empty ones dropped.
    pub fn items(&self) -> Vec<&str> {
        match self {
            Self::Delimited(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .collect(),
            Self::List(list) => list
                .iter()
                .map(|tag| tag.trim())
                .filter(|tag| !tag.is_empty())
                .collect(),
        }
    }
}

impl VideoRecord {
    pub fn id(&self) -> Option<&str> {
        present(&self.id)
    }

    pub fn title(&self) -> Option<&str> {
        present(&self.title)
    }

    pub fn description(&self) -> Option<&str> {
        present(&self.description)
    }

    pub fn thumbnail(&self) -> Option<&str> {
        present(&self.thumbnail)
    }

    pub fn embed_url(&self) -> Option<&str> {
        present(&self.embed_url)
    }

    pub fn date_published(&self) -> Option<&str> {
        present(&self.date_published)
    }

    pub fn date_modified(&self) -> Option<&str> {
        present(&self.date_modified)
    }

    pub fn category(&self) -> Option<&str> {
        present(&self.category)
    }

    /// Tags of this record; empty when none are set.
    pub fn tag_items(&self) -> Vec<&str> {
        self.tags.as_ref().map(Tags::items).unwrap_or_default()
    }

    /// Duration in whole seconds.
    ///
    /// Fractional values are rounded. Missing, non-numeric and non-positive
    /// values fall back to [`DEFAULT_DURATION_SECS`].
    pub fn duration_secs(&self) -> u64 {
        let seconds = match &self.duration {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };

        match seconds.map(f64::round) {
            Some(rounded) if rounded.is_finite() && rounded >= 1.0 => rounded as u64,
            _ => DEFAULT_DURATION_SECS,
        }
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Accept strings and numbers; anything else counts as absent.
fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn tags<'de, D>(deserializer: D) -> Result<Option<Tags>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(Tags::Delimited(s)),
        Some(Value::Array(items)) => Some(Tags::List(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect(),
        )),
        _ => None,
    })
}

/// Parse a catalog given either as a JSON array of records or as an object
/// with a `videos` array.
///
/// Only the document shape is fatal. Items that are not records are logged
/// and left out.
pub fn parse_catalog(json: &str) -> serde_json::Result<Vec<VideoRecord>> {
    let items = match serde_json::from_str::<Value>(json)? {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("videos") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(serde::de::Error::custom(
                    "expected a `videos` array in the catalog object",
                ));
            }
        },
        _ => {
            return Err(serde::de::Error::custom(
                "expected a JSON array of videos or an object with a `videos` array",
            ));
        }
    };

    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match VideoRecord::deserialize(item) {
            Ok(video) => Some(video),
            Err(err) => {
                tracing::warn!(index, %err, "skipping malformed catalog entry");
                None
            }
        })
        .collect())
}
