//! Mood colors and the composite background rendered for a day.
//!
//! Stored colors come in two historical encodings: a JSON object
//! `{"name": .., "value": ..}` and a bare color string. [`MoodColor::decode`]
//! accepts both; [`MoodColor::encode`] only ever writes the object form.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// Background for a day with no mood set.
pub const PLACEHOLDER_BACKGROUND: &str = "transparent";

const UNKNOWN_COLOR_NAME: &str = "Unknown";
const UNKNOWN_COLOR_VALUE: &str = "gray";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("color value is empty")]
    Empty,

    #[error("malformed color encoding: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MoodColor {
    pub name: String,
    pub value: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredColor {
    Object {
        #[serde(default)]
        name: Option<String>,
        value: String,
    },
    Plain(String),
}

impl MoodColor {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn unknown() -> Self {
        Self::new(UNKNOWN_COLOR_NAME, UNKNOWN_COLOR_VALUE)
    }

    pub fn decode(stored: &str) -> Result<Self, ColorError> {
        let trimmed = stored.trim();
        if trimmed.is_empty() {
            return Err(ColorError::Empty);
        }

        if !(trimmed.starts_with('{') || trimmed.starts_with('"')) {
            return Ok(Self::new(trimmed, trimmed));
        }

        let parsed = serde_json::from_str::<StoredColor>(trimmed)
            .map_err(|e| ColorError::Malformed(e.to_string()))?;

        let (name, value) = match parsed {
            StoredColor::Object { name, value } => (name, value),
            StoredColor::Plain(value) => (None, value),
        };

        let value = value.trim().to_string();
        if value.is_empty() {
            return Err(ColorError::Empty);
        }

        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| value.clone());

        Ok(Self { name, value })
    }

    /// Best-effort replacement for a color that failed to decode: the raw
    /// stored text becomes the display value, or the unknown sentinel when
    /// there is nothing to display.
    pub fn fallback(stored: &str) -> Self {
        let trimmed = stored.trim();
        if trimmed.is_empty() {
            Self::unknown()
        } else {
            Self::new(UNKNOWN_COLOR_NAME, trimmed)
        }
    }

    pub fn encode(&self) -> String {
        serde_json::json!({ "name": self.name, "value": self.value }).to_string()
    }
}

/// `#` followed by exactly six hex digits.
pub fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .map(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
        .unwrap_or(false)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Background {
    Placeholder,
    Solid(String),
    /// Equal-width, hard-edged stripes, left to right.
    Stripes(Vec<String>),
}

impl Background {
    pub fn css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Background::Placeholder => f.write_str(PLACEHOLDER_BACKGROUND),
            Background::Solid(color) => f.write_str(color),
            Background::Stripes(colors) => {
                let n = colors.len();
                let stops: Vec<String> = colors
                    .iter()
                    .enumerate()
                    .map(|(i, color)| {
                        format!(
                            "{color} {}, {color} {}",
                            percent(i, n),
                            percent(i + 1, n)
                        )
                    })
                    .collect();
                write!(f, "linear-gradient(to right, {})", stops.join(", "))
            }
        }
    }
}

impl Serialize for Background {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn percent(index: usize, count: usize) -> String {
    let raw = format!("{:.4}", index as f64 * 100.0 / count as f64);
    let trimmed = raw.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed}%")
}

/// Map a day's mood colors, in attachment order, to a single background.
pub fn project_color<S: AsRef<str>>(colors: &[S]) -> Background {
    match colors {
        [] => Background::Placeholder,
        [only] => Background::Solid(only.as_ref().to_string()),
        many => Background::Stripes(many.iter().map(|c| c.as_ref().to_string()).collect()),
    }
}

/// Result of clicking a day while a color filter may be active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "color", rename_all = "snake_case")]
pub enum FilterOutcome {
    Set(String),
    Cleared,
    Unchanged,
    /// The day has several colors and none is the active filter.
    Ambiguous,
}

impl FilterOutcome {
    /// The filter that should be active after this outcome.
    pub fn apply(&self, active: Option<&str>) -> Option<String> {
        match self {
            FilterOutcome::Set(color) => Some(color.clone()),
            FilterOutcome::Cleared => None,
            FilterOutcome::Unchanged | FilterOutcome::Ambiguous => active.map(str::to_string),
        }
    }

    pub fn warning(&self) -> Option<&'static str> {
        match self {
            FilterOutcome::Ambiguous => Some("Cannot filter by multiple values, pick one"),
            _ => None,
        }
    }
}

pub fn resolve_click<S: AsRef<str>>(day_colors: &[S], active: Option<&str>) -> FilterOutcome {
    match day_colors {
        [] => FilterOutcome::Unchanged,
        [only] => {
            if active == Some(only.as_ref()) {
                FilterOutcome::Cleared
            } else {
                FilterOutcome::Set(only.as_ref().to_string())
            }
        }
        many => match active {
            Some(filter) if many.iter().any(|c| c.as_ref() == filter) => FilterOutcome::Cleared,
            _ => FilterOutcome::Ambiguous,
        },
    }
}

/// Whether a day should stay highlighted under `filter`.
pub fn matches_filter<S: AsRef<str>>(day_colors: &[S], filter: Option<&str>) -> bool {
    match filter {
        None => true,
        Some(filter) => day_colors.iter().any(|c| c.as_ref() == filter),
    }
}
