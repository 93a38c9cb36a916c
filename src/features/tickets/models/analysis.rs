use serde::{Deserialize, Serialize};
use sqlx::Type;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::shared::llm::{parse_with_fallback, LlmResponse};

/// Ticket category, matching the `ticket_category` database enum
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Type, ToSchema,
)]
#[sqlx(type_name = "ticket_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Billing,
    TechSupport,
    Sales,
    Returns,
    GeneralInfo,
    Complaints,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Billing,
        Category::TechSupport,
        Category::Sales,
        Category::Returns,
        Category::GeneralInfo,
        Category::Complaints,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Billing => "billing",
            Category::TechSupport => "tech_support",
            Category::Sales => "sales",
            Category::Returns => "returns",
            Category::GeneralInfo => "general_info",
            Category::Complaints => "complaints",
            Category::Other => "other",
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unknown category '{}'", s))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ticket sentiment, matching the `ticket_sentiment` database enum
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Type, ToSchema,
)]
#[sqlx(type_name = "ticket_sentiment", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

impl FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sentiment::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| format!("Unknown sentiment '{}'", s))
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category and sentiment labels produced by one analysis
///
/// The default value (`other` / `neutral`) is what every unusable model reply
/// degrades to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub struct AnalysisResult {
    pub category: Category,
    pub sentiment: Sentiment,
}

impl AnalysisResult {
    pub fn new(category: Category, sentiment: Sentiment) -> Self {
        Self {
            category,
            sentiment,
        }
    }

    /// Extract labels from a raw model reply. Never fails.
    ///
    /// The first flat JSON object in the text is decoded; `category` and
    /// `sentiment` are lower-cased and checked against the closed vocabularies.
    /// Missing keys and unknown labels fall back per field. A present key whose
    /// value is not a string (including `null`) discards the whole reply.
    pub fn parse_reply(text: &str) -> Self {
        let raw: RawAnalysis = parse_with_fallback(text);

        if !raw.is_success() {
            tracing::debug!(
                "Model reply unusable, defaulting labels: {:?}",
                raw.llm_error_message
            );
        }

        raw.into()
    }
}

fn default_true() -> bool {
    true
}

/// Keep an explicit `null` as `Some(Value::Null)` so it is not mistaken for a missing key
fn present<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

/// Model reply as decoded from JSON, before vocabulary checks
#[derive(Debug, Default, Deserialize)]
struct RawAnalysis {
    #[serde(default, deserialize_with = "present")]
    category: Option<serde_json::Value>,

    #[serde(default, deserialize_with = "present")]
    sentiment: Option<serde_json::Value>,

    #[serde(skip_deserializing, default = "default_true")]
    is_llm_success: bool,

    #[serde(skip)]
    llm_error_message: Option<String>,
}

impl LlmResponse for RawAnalysis {
    fn mark_as_fallback(&mut self, error_message: String) {
        self.is_llm_success = false;
        self.llm_error_message = Some(error_message);
    }

    fn is_success(&self) -> bool {
        self.is_llm_success
    }
}

/// Lower-case a JSON string value and parse it into a label
fn label_from_value<T: FromStr>(value: Option<&serde_json::Value>) -> Option<T> {
    value
        .and_then(serde_json::Value::as_str)
        .map(str::to_lowercase)
        .and_then(|s| s.parse().ok())
}

impl From<RawAnalysis> for AnalysisResult {
    fn from(raw: RawAnalysis) -> Self {
        let non_string =
            |v: &Option<serde_json::Value>| v.as_ref().is_some_and(|v| !v.is_string());
        if non_string(&raw.category) || non_string(&raw.sentiment) {
            tracing::warn!(
                "Model returned non-string labels, using defaults: category={:?}, sentiment={:?}",
                raw.category,
                raw.sentiment
            );
            return Self::default();
        }

        let category = label_from_value(raw.category.as_ref()).unwrap_or_else(|| {
            if raw.category.is_some() {
                tracing::warn!("Model returned unknown category: {:?}", raw.category);
            }
            Category::default()
        });

        let sentiment = label_from_value(raw.sentiment.as_ref()).unwrap_or_else(|| {
            if raw.sentiment.is_some() {
                tracing::warn!("Model returned unknown sentiment: {:?}", raw.sentiment);
            }
            Sentiment::default()
        });

        Self {
            category,
            sentiment,
        }
    }
}
