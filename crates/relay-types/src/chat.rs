//! Request and response bodies for the relay's HTTP endpoints.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Successful reply of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// One message of a conversation submitted for titling.
///
/// `role` is kept as free text: `"user"` marks the user's turns and every
/// other value is rendered as the assistant. A non-string role (number,
/// null, object) is accepted and stored as an empty string; only a missing
/// `role` or a bad `content` fails to decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    #[serde(deserialize_with = "lenient_role")]
    pub role: String,
    pub content: String,
}

fn lenient_role<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Role {
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Role::deserialize(deserializer)? {
        Role::Text(role) => role,
        Role::Other(_) => String::new(),
    })
}

impl Turn {
    pub fn is_user(&self) -> bool {
        self.role == "user"
    }
}

/// Body of `POST /generate-title`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleRequest {
    pub conversation: Vec<Turn>,
}

/// Successful reply of `POST /generate-title`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleResponse {
    pub title: String,
}

/// Error body shared by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_with_string_role() {
        let turn: Turn = serde_json::from_str(r#"{"role": "user", "content": "hi"}"#).unwrap();
        assert!(turn.is_user());
        assert_eq!(turn.content, "hi");
    }

    #[test]
    fn turn_with_non_string_role_is_not_user() {
        for raw in [
            r#"{"role": 1, "content": "hi"}"#,
            r#"{"role": null, "content": "hi"}"#,
            r#"{"role": {"name": "user"}, "content": "hi"}"#,
        ] {
            let turn: Turn = serde_json::from_str(raw).unwrap();
            assert!(!turn.is_user());
            assert_eq!(turn.content, "hi");
        }
    }

    #[test]
    fn turn_without_role_or_with_bad_content_fails() {
        assert!(serde_json::from_str::<Turn>(r#"{"content": "hi"}"#).is_err());
        assert!(serde_json::from_str::<Turn>(r#"{"role": "user", "content": 5}"#).is_err());
        assert!(serde_json::from_str::<Turn>(r#"{"role": "user"}"#).is_err());
    }
}
