#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use anyhow::Result;
use chrono::Utc;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::is_email_shaped;
use super::DeskError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Sent,
    Received,
}

/// One record in the mirror store. Timestamps are unix milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorMessage {
    #[serde(rename = "contactId")]
    pub contact_id: String,
    pub message: String,
    pub timestamp: i64,
    pub direction: Direction,
}

impl MirrorMessage {
    pub fn new(contact_id: &str, message: &str, direction: Direction) -> MirrorMessage {
        return MirrorMessage {
            contact_id: contact_id.to_string(),
            message: message.to_string(),
            timestamp: Utc::now().timestamp_millis(),
            direction,
        };
    }

    pub fn validate(&self) -> Result<()> {
        if !is_email_shaped(&self.contact_id) {
            return Err(DeskError::Validation(format!(
                "contactId is not email-shaped: {}",
                self.contact_id
            ))
            .into());
        }
        if self.message.is_empty() {
            return Err(DeskError::Validation("message is empty".to_string()).into());
        }

        return Ok(());
    }
}
