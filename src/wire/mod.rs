use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{ListingError, Result};

/// ========================================
/// Generated copy
/// ========================================

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputField {
    Heading,
    Mls,
    Zillow,
    Social,
    Email,
    Tiktok,
}

impl OutputField {
    pub const ALL: [OutputField; 6] = [
        OutputField::Heading,
        OutputField::Mls,
        OutputField::Zillow,
        OutputField::Social,
        OutputField::Email,
        OutputField::Tiktok,
    ];

    /// JSON key used both in the model response and in persisted history.
    pub fn as_str(self) -> &'static str {
        match self {
            OutputField::Heading => "heading",
            OutputField::Mls => "mls",
            OutputField::Zillow => "zillow",
            OutputField::Social => "social",
            OutputField::Email => "email",
            OutputField::Tiktok => "tiktok",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == s)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingOutputs {
    pub heading: String,
    pub mls: String,
    pub zillow: String,
    pub social: String,
    pub email: String,
    pub tiktok: String,
}

impl ListingOutputs {
    pub fn get(&self, field: OutputField) -> &str {
        match field {
            OutputField::Heading => &self.heading,
            OutputField::Mls => &self.mls,
            OutputField::Zillow => &self.zillow,
            OutputField::Social => &self.social,
            OutputField::Email => &self.email,
            OutputField::Tiktok => &self.tiktok,
        }
    }

    pub fn set(&mut self, field: OutputField, text: String) {
        let slot = match field {
            OutputField::Heading => &mut self.heading,
            OutputField::Mls => &mut self.mls,
            OutputField::Zillow => &mut self.zillow,
            OutputField::Social => &mut self.social,
            OutputField::Email => &mut self.email,
            OutputField::Tiktok => &mut self.tiktok,
        };
        *slot = text;
    }
}

fn parse_object(content: &str) -> Result<Map<String, Value>> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| ListingError::Parse(format!("model returned invalid JSON: {e}")))?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ListingError::Parse(format!(
            "expected a JSON object, got {}",
            kind_of(&other)
        ))),
    }
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Shape-check a generation response. Missing or null keys become empty
/// strings; a key holding anything other than a string is rejected.
pub fn parse_outputs(content: &str) -> Result<ListingOutputs> {
    let map = parse_object(content)?;
    let mut out = ListingOutputs::default();
    for field in OutputField::ALL {
        match map.get(field.as_str()) {
            Some(Value::String(s)) => out.set(field, s.clone()),
            None | Some(Value::Null) => {
                tracing::warn!(field = field.as_str(), "model response missing key; using empty text");
            }
            Some(other) => {
                return Err(ListingError::Parse(format!(
                    "`{}` should be a string, got {}",
                    field.as_str(),
                    kind_of(other)
                )))
            }
        }
    }
    Ok(out)
}

pub fn parse_rewrite(field: OutputField, content: &str) -> Result<String> {
    let map = parse_object(content)?;
    match map.get(field.as_str()) {
        Some(Value::String(s)) => Ok(s.clone()),
        _ => Err(ListingError::MissingField(field.as_str().into())),
    }
}

/// ========================================
/// Chat completions wire protocol
/// ========================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: &str) -> Self {
        Self { role: "system".into(), content: content.into() }
    }

    pub fn user(content: &str) -> Self {
        Self { role: "user".into(), content: content.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: String,
}

impl ResponseFormat {
    pub fn json_object() -> Self {
        Self { kind: "json_object".into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub response_format: ResponseFormat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_complete_outputs() {
        let out = parse_outputs(
            r#"{"heading":"H","mls":"M","zillow":"Z","social":"S","email":"E","tiktok":"T"}"#,
        )
        .unwrap();
        assert_eq!(out.heading, "H");
        assert_eq!(out.tiktok, "T");
    }

    #[test]
    fn missing_keys_default_to_empty() {
        let out = parse_outputs(r#"{"heading":"Only this","email":null}"#).unwrap();
        assert_eq!(out.heading, "Only this");
        assert_eq!(out.mls, "");
        assert_eq!(out.email, "");
    }

    #[test]
    fn non_string_value_is_a_parse_error() {
        let err = parse_outputs(r#"{"heading":42}"#).unwrap_err();
        assert!(matches!(err, ListingError::Parse(ref m) if m.contains("heading")));
    }

    #[test]
    fn non_json_is_a_parse_error() {
        let err = parse_outputs("Sure! Here is your listing").unwrap_err();
        assert!(matches!(err, ListingError::Parse(_)));
        assert!(err.to_string().starts_with("OpenAI Error:"));
        assert!(matches!(parse_outputs("[1,2]"), Err(ListingError::Parse(_))));
    }

    #[test]
    fn rewrite_requires_requested_key() {
        assert_eq!(parse_rewrite(OutputField::Social, r#"{"social":"New"}"#).unwrap(), "New");
        assert_eq!(
            parse_rewrite(OutputField::Social, r#"{"mls":"wrong key"}"#),
            Err(ListingError::MissingField("social".into()))
        );
        assert!(matches!(
            parse_rewrite(OutputField::Social, "nope"),
            Err(ListingError::Parse(_))
        ));
    }

    #[test]
    fn set_replaces_only_one_field() {
        let mut out = ListingOutputs { heading: "h".into(), mls: "m".into(), ..Default::default() };
        out.set(OutputField::Mls, "new".into());
        assert_eq!(out.mls, "new");
        assert_eq!(out.heading, "h");
        assert_eq!(OutputField::parse("tiktok"), Some(OutputField::Tiktok));
        assert_eq!(OutputField::parse("instagram"), None);
    }
}
