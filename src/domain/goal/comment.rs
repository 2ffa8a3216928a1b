//! Free-text comments attached to goals and key results.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CommentId, GoalId, KeyResultId, Timestamp, ValidationError};

/// What a comment is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum CommentTarget {
    Goal(GoalId),
    KeyResult(KeyResultId),
}

/// Opaque timestamped note. Listed newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub target: CommentTarget,
    pub text: String,
    pub created_at: Timestamp,
}

/// Trims comment text and rejects blanks.
pub fn comment_text(raw: &str) -> Result<String, ValidationError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(ValidationError::empty_field("text"));
    }
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_text_is_trimmed() {
        assert_eq!(comment_text("  looks good \n").unwrap(), "looks good");
    }

    #[test]
    fn blank_comment_is_rejected() {
        assert!(comment_text(" \t").is_err());
    }

    #[test]
    fn target_serializes_with_kind_tag() {
        let json = serde_json::to_string(&CommentTarget::KeyResult(KeyResultId::new(4))).unwrap();
        assert_eq!(json, r#"{"kind":"key_result","id":4}"#);
    }
}
