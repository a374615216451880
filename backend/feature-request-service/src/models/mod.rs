/// Data structures for feature requests
///
/// `FeatureRequest` is the stored record. `NewFeatureRequest` is the only
/// value a store accepts for insertion, so every persisted title and
/// description has already been trimmed and bounds-checked.
use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

pub const TITLE_MAX_CHARS: usize = 255;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

pub const TITLE_REQUIRED_MSG: &str = "Title is required";
pub const TITLE_LENGTH_MSG: &str = "Title must be between 1 and 255 characters";
pub const DESCRIPTION_LENGTH_MSG: &str = "Description must not exceed 1000 characters";
pub const TITLE_NUL_MSG: &str = "Title must not contain null characters";
pub const DESCRIPTION_NUL_MSG: &str = "Description must not contain null characters";

/// A proposed enhancement with its running vote count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRequest {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub votes: i64,
    pub created_at: DateTime<Utc>,
}

/// One failed field constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validated input for `FeatureStore::create`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeatureRequest {
    title: String,
    description: Option<String>,
}

impl NewFeatureRequest {
    /// Trim and check both fields; a blank description becomes `None`
    pub fn parse(title: &str, description: Option<&str>) -> Result<Self, Vec<FieldViolation>> {
        let title = title.trim();
        let description = description.map(str::trim).filter(|d| !d.is_empty());

        let mut violations = Vec::new();

        if let Some(message) = title_violation(title) {
            violations.push(FieldViolation::new("title", message));
        }
        if let Some(message) = description.and_then(description_violation) {
            violations.push(FieldViolation::new("description", message));
        }

        if !violations.is_empty() {
            return Err(violations);
        }

        Ok(Self {
            title: title.to_string(),
            description: description.map(str::to_string),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Request body for `POST /api/v1/features`
///
/// Numbers and booleans are accepted as text (`123` becomes `"123"`); `null`
/// is treated as absent. Objects and arrays fail deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateFeatureRequest {
    #[serde(default, deserialize_with = "scalar_text")]
    #[validate(custom(function = "validate_title"))]
    pub title: String,
    #[serde(default, deserialize_with = "optional_scalar_text")]
    #[validate(custom(function = "validate_description"))]
    pub description: Option<String>,
}

fn text_from_scalar<E: de::Error>(value: Value) -> Result<Option<String>, E> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Array(_) | Value::Object(_) => Err(E::custom("expected a string")),
    }
}

fn scalar_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    text_from_scalar(Value::deserialize(deserializer)?).map(Option::unwrap_or_default)
}

fn optional_scalar_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    text_from_scalar(Value::deserialize(deserializer)?)
}

impl CreateFeatureRequest {
    /// Trimmed copy of the request; blank descriptions are dropped
    pub fn normalized(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: self
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
        }
    }
}

// PostgreSQL text columns reject U+0000, so neither engine accepts it
fn title_violation(title: &str) -> Option<&'static str> {
    let title = title.trim();
    if title.is_empty() {
        Some(TITLE_REQUIRED_MSG)
    } else if title.chars().count() > TITLE_MAX_CHARS {
        Some(TITLE_LENGTH_MSG)
    } else if title.contains('\0') {
        Some(TITLE_NUL_MSG)
    } else {
        None
    }
}

fn description_violation(description: &str) -> Option<&'static str> {
    let description = description.trim();
    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        Some(DESCRIPTION_LENGTH_MSG)
    } else if description.contains('\0') {
        Some(DESCRIPTION_NUL_MSG)
    } else {
        None
    }
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    match title_violation(title) {
        Some(message) => Err(ValidationError::new("title").with_message(Cow::Borrowed(message))),
        None => Ok(()),
    }
}

fn validate_description(description: &str) -> Result<(), ValidationError> {
    match description_violation(description) {
        Some(message) => {
            Err(ValidationError::new("description").with_message(Cow::Borrowed(message)))
        }
        None => Ok(()),
    }
}

/// Flatten validator output into field/message pairs, ordered by field
pub fn violations_from(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut violations: Vec<FieldViolation> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                FieldViolation::new(field.clone(), message)
            })
        })
        .collect();
    violations.sort_by(|a, b| a.field.cmp(&b.field));
    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_nulls_blank_description() {
        let new = NewFeatureRequest::parse("  Add dark mode  ", Some("   ")).unwrap();
        assert_eq!(new.title(), "Add dark mode");
        assert_eq!(new.description(), None);

        let new = NewFeatureRequest::parse("Export", Some(" to CSV ")).unwrap();
        assert_eq!(new.description(), Some("to CSV"));
    }

    #[test]
    fn test_parse_title_bounds() {
        let err = NewFeatureRequest::parse("   ", None).unwrap_err();
        assert_eq!(err, vec![FieldViolation::new("title", TITLE_REQUIRED_MSG)]);

        let err = NewFeatureRequest::parse(&"x".repeat(256), None).unwrap_err();
        assert_eq!(err, vec![FieldViolation::new("title", TITLE_LENGTH_MSG)]);

        assert!(NewFeatureRequest::parse(&"x".repeat(255), None).is_ok());
    }

    #[test]
    fn test_parse_description_bounds() {
        let new = NewFeatureRequest::parse("Fine", Some(&"d".repeat(1000))).unwrap();
        assert_eq!(new.description().map(|d| d.chars().count()), Some(1000));

        // Surrounding whitespace does not count toward the limit
        let padded = format!("  {}  ", "d".repeat(1000));
        assert!(NewFeatureRequest::parse("Fine", Some(&padded)).is_ok());

        let err = NewFeatureRequest::parse("Fine", Some(&"d".repeat(1001))).unwrap_err();
        assert_eq!(
            err,
            vec![FieldViolation::new("description", DESCRIPTION_LENGTH_MSG)]
        );
    }

    #[test]
    fn test_parse_rejects_nul_characters() {
        let err = NewFeatureRequest::parse("a\0b", None).unwrap_err();
        assert_eq!(err, vec![FieldViolation::new("title", TITLE_NUL_MSG)]);

        let err = NewFeatureRequest::parse("Fine", Some("x\0")).unwrap_err();
        assert_eq!(
            err,
            vec![FieldViolation::new("description", DESCRIPTION_NUL_MSG)]
        );
    }

    #[test]
    fn test_create_request_shares_store_rules() {
        let req = CreateFeatureRequest {
            title: "a\0b".to_string(),
            description: Some("d".repeat(1000)),
        }
        .normalized();
        let errors = req.validate().unwrap_err();
        assert_eq!(
            violations_from(&errors),
            vec![FieldViolation::new("title", TITLE_NUL_MSG)]
        );

        let req = CreateFeatureRequest {
            title: "Fine".to_string(),
            description: Some("d\0".to_string()),
        };
        let errors = req.validate().unwrap_err();
        assert_eq!(
            violations_from(&errors),
            vec![FieldViolation::new("description", DESCRIPTION_NUL_MSG)]
        );
    }

    #[test]
    fn test_parse_counts_characters_not_bytes() {
        // 255 two-byte characters
        let title = "é".repeat(255);
        assert!(NewFeatureRequest::parse(&title, None).is_ok());
    }

    #[test]
    fn test_parse_reports_every_field() {
        let err = NewFeatureRequest::parse("", Some(&"d".repeat(1001))).unwrap_err();
        assert_eq!(err.len(), 2);
        assert_eq!(err[1], FieldViolation::new("description", DESCRIPTION_LENGTH_MSG));
    }

    #[test]
    fn test_create_request_validation_messages() {
        let req = CreateFeatureRequest {
            title: "x".repeat(300),
            description: Some("d".repeat(1001)),
        }
        .normalized();

        let errors = req.validate().unwrap_err();
        let violations = violations_from(&errors);
        assert_eq!(
            violations,
            vec![
                FieldViolation::new("description", DESCRIPTION_LENGTH_MSG),
                FieldViolation::new("title", TITLE_LENGTH_MSG),
            ]
        );
    }

    #[test]
    fn test_create_request_missing_title() {
        let req: CreateFeatureRequest = serde_json::from_str(r#"{"description":"x"}"#).unwrap();
        let errors = req.normalized().validate().unwrap_err();
        assert_eq!(
            violations_from(&errors),
            vec![FieldViolation::new("title", TITLE_REQUIRED_MSG)]
        );
    }

    #[test]
    fn test_create_request_accepts_scalar_text() {
        let req: CreateFeatureRequest =
            serde_json::from_str(r#"{"title":123,"description":true}"#).unwrap();
        assert_eq!(req.title, "123");
        assert_eq!(req.description.as_deref(), Some("true"));

        let req: CreateFeatureRequest =
            serde_json::from_str(r#"{"title":null,"description":null}"#).unwrap();
        assert_eq!(req.title, "");
        assert_eq!(req.description, None);

        assert!(serde_json::from_str::<CreateFeatureRequest>(r#"{"title":{"a":1}}"#).is_err());
        assert!(serde_json::from_str::<CreateFeatureRequest>(r#"{"title":["x"]}"#).is_err());
    }

    #[test]
    fn test_feature_serializes_camel_case() {
        let feature = FeatureRequest {
            id: 7,
            title: "Add dark mode".to_string(),
            description: None,
            votes: 3,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&feature).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["votes"], 3);
        assert!(json["description"].is_null());
        assert!(json.get("createdAt").is_some());
    }
}
