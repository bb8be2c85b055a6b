use serde::Serialize;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Serialize)]
#[serde(tag = "event_type")]
pub enum BusinessEvent {
    UserLoggedIn {
        user_id: Uuid,
    },
    LoginFailed {
        email_redacted: String,
        reason: String,
    },
    OAuthLoginCompleted {
        username: String,
    },
    CommentCreated {
        comment_id: Uuid,
        post_id: Uuid,
        approved: bool,
        registered: bool,
    },
    CommentApproved {
        comment_id: Uuid,
        admin_id: Uuid,
    },
    CommentDeleted {
        comment_id: Uuid,
        removed: usize,
    },
    PostCreated {
        post_id: Uuid,
    },
    PostDeleted {
        post_id: Uuid,
    },
}

pub fn redact_email(email: &str) -> String {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return "***".to_string();
    }
    let mut parts = trimmed.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");
    if local.is_empty() || domain.is_empty() {
        return "***".to_string();
    }
    let first_char = local.chars().next().unwrap_or('*');
    format!("{first_char}***@{domain}")
}

impl BusinessEvent {
    pub fn log(&self) {
        let event_json = serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self));
        info!(
            target: "business_events",
            event = %event_json,
            "Business event occurred"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::redact_email;

    #[test]
    fn redacts_local_part() {
        assert_eq!(redact_email("alice@example.com"), "a***@example.com");
    }

    #[test]
    fn handles_missing_at_sign() {
        assert_eq!(redact_email("not-an-email"), "***");
    }

    #[test]
    fn handles_empty_input() {
        assert_eq!(redact_email("  "), "***");
    }
}
