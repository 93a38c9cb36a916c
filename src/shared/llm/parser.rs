use lazy_static::lazy_static;
use regex::Regex;

use super::LlmResponse;

lazy_static! {
    /// First flat `{...}` block in the text. Nested objects are not supported.
    static ref JSON_OBJECT_RE: Regex = Regex::new(r"\{[^}]+\}").unwrap();
}

/// Extract the first flat JSON object candidate from free text
///
/// Models tend to wrap the answer in prose or markdown fences, so only the
/// first `{ ... }` run without a closing brace inside is considered.
pub fn extract_json_object(text: &str) -> Option<&str> {
    JSON_OBJECT_RE.find(text).map(|m| m.as_str())
}

/// Try to parse text as the target type
///
/// The candidate is decoded into a `serde_json::Value` first so duplicate keys
/// resolve to the last occurrence instead of failing the whole parse.
fn try_parse<T>(text: &str) -> Result<T, String>
where
    T: LlmResponse,
{
    let json_str = extract_json_object(text).ok_or_else(|| {
        format!(
            "No JSON object found in response: {}",
            text.chars().take(200).collect::<String>()
        )
    })?;

    tracing::debug!(
        "Extracted JSON (first 500 chars): {}",
        json_str.chars().take(500).collect::<String>()
    );

    let value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| format!("Invalid JSON in response ({}): {}", e, json_str))?;

    serde_json::from_value::<T>(value)
        .map_err(|e| format!("Unexpected JSON shape ({}): {}", e, json_str))
}

/// Parse LLM response text with graceful fallback
///
/// Never fails: when no object can be extracted or decoded, `T::default()` is
/// returned with the reason attached through [`LlmResponse::mark_as_fallback`].
pub fn parse_with_fallback<T>(text: &str) -> T
where
    T: LlmResponse,
{
    match try_parse::<T>(text) {
        Ok(parsed) => parsed,
        Err(error_msg) => {
            tracing::warn!("LLM response parsing failed, using fallback: {}", error_msg);
            let mut fallback = T::default();
            fallback.mark_as_fallback(error_msg);
            fallback
        }
    }
}
