use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationErrors};

/// A persisted Todo row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "storage", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[cfg_attr(feature = "storage", sqlx(rename = "isCompleted"))]
    pub is_completed: bool,
}

impl Todo {
    pub fn from_new(id: i64, fields: NewTodo) -> Self {
        Self {
            id,
            name: fields.name,
            description: fields.description,
            is_completed: fields.is_completed,
        }
    }
}

/// Normalized write-path fields. Only produced by [`TodoPayload::into_new_todo`],
/// so every value here already satisfies the payload schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub name: String,
    pub description: String,
    pub is_completed: bool,
}

/// Body accepted by create and update. Update is a full replacement, so both
/// share this schema.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct TodoPayload {
    #[validate(
        required(message = "\"name\" is required"),
        length(min = 4, message = "\"name\" length must be at least 4 characters long")
    )]
    pub name: Option<String>,
    #[validate(
        required(message = "\"description\" is required"),
        length(min = 4, message = "\"description\" length must be at least 4 characters long")
    )]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_completed: Option<bool>,
}

impl TodoPayload {
    pub fn into_new_todo(self) -> Result<NewTodo, String> {
        self.validate().map_err(|e| describe(&e))?;
        Ok(NewTodo {
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            is_completed: self.is_completed.unwrap_or(false),
        })
    }
}

fn describe(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("\"{field}\" is invalid"))
            })
        })
        .collect::<Vec<_>>()
        .join(". ")
}

/// Accepts `true`/`false` as JSON booleans or as case-insensitive strings.
/// Only called when the key is present, so an explicit `null` is an error.
fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match Option::<BoolOrString>::deserialize(deserializer)? {
        Some(BoolOrString::Bool(b)) => Ok(Some(b)),
        Some(BoolOrString::String(s)) if s.eq_ignore_ascii_case("true") => Ok(Some(true)),
        Some(BoolOrString::String(s)) if s.eq_ignore_ascii_case("false") => Ok(Some(false)),
        None | Some(BoolOrString::String(_)) => Err(serde::de::Error::custom(
            "\"isCompleted\" must be a boolean",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> TodoPayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn is_completed_defaults_to_false() {
        let todo = payload(r#"{"name":"Buy milk","description":"2% milk"}"#)
            .into_new_todo()
            .unwrap();
        assert_eq!(todo.name, "Buy milk");
        assert_eq!(todo.description, "2% milk");
        assert!(!todo.is_completed);
    }

    #[test]
    fn is_completed_accepts_string_booleans() {
        let todo = payload(r#"{"name":"Walk dog","description":"around","isCompleted":"TRUE"}"#)
            .into_new_todo()
            .unwrap();
        assert!(todo.is_completed);
    }

    #[test]
    fn is_completed_rejects_other_strings() {
        let result: Result<TodoPayload, _> =
            serde_json::from_str(r#"{"name":"Walk dog","description":"around","isCompleted":"yes"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn is_completed_rejects_null() {
        let result: Result<TodoPayload, _> =
            serde_json::from_str(r#"{"name":"Walk dog","description":"around","isCompleted":null}"#);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("\"isCompleted\" must be a boolean"), "{err}");
    }

    #[test]
    fn short_fields_are_reported_in_field_order() {
        let err = payload(r#"{"name":"abc","description":"xy"}"#)
            .into_new_todo()
            .unwrap_err();
        assert_eq!(
            err,
            "\"description\" length must be at least 4 characters long. \
             \"name\" length must be at least 4 characters long"
        );
    }

    #[test]
    fn missing_fields_are_required() {
        let err = payload(r#"{"isCompleted":true}"#).into_new_todo().unwrap_err();
        assert_eq!(err, "\"description\" is required. \"name\" is required");
    }

    #[test]
    fn four_characters_is_enough() {
        assert!(payload(r#"{"name":"abcd","description":"wxyz"}"#).into_new_todo().is_ok());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<TodoPayload, _> =
            serde_json::from_str(r#"{"name":"abcd","description":"wxyz","id":9}"#);
        assert!(result.is_err());
    }

    #[test]
    fn todo_serializes_camel_case() {
        let todo = Todo {
            id: 1,
            name: "Buy milk".into(),
            description: "2% milk".into(),
            is_completed: false,
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id":1,"name":"Buy milk","description":"2% milk","isCompleted":false})
        );
    }
}
