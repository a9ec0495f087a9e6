#[cfg(test)]
#[path = "command_test.rs"]
mod tests;

use anyhow::Result;
use chrono::DateTime;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use uuid::Uuid;

use super::Contact;
use super::DeskError;
use super::Direction;
use super::MirrorMessage;

/// The two upstream command targets. They are distinct capabilities on the
/// gateway side and must not be unified behind one address.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CommandTarget {
    Desk,
    Crm,
}

impl CommandTarget {
    pub fn address(&self) -> &'static str {
        match self {
            CommandTarget::Desk => return "postmaster@desk.msging.net",
            CommandTarget::Crm => return "postmaster@crm.msging.net",
        }
    }
}

/// Envelope for gateway command requests, POSTed to `{gateway-url}/commands`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRequest {
    pub id: String,
    pub to: String,
    pub method: String,
    pub uri: String,
}

impl CommandRequest {
    pub fn get(target: CommandTarget, uri: &str) -> CommandRequest {
        return CommandRequest {
            id: Uuid::new_v4().to_string(),
            to: target.address().to_string(),
            method: "get".to_string(),
            uri: uri.to_string(),
        };
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactsResource {
    pub items: Vec<Contact>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactsResponse {
    pub resource: ContactsResource,
}

/// One message as the gateway reports it in a thread history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub direction: Direction,
    pub content: String,
    pub timestamp: String,
}

impl ThreadMessage {
    /// Converts a gateway thread message into a mirror record. The gateway
    /// reports RFC 3339 timestamps; a malformed one fails the whole payload.
    pub fn into_mirror(self, contact_id: &str) -> Result<MirrorMessage> {
        let timestamp = DateTime::parse_from_rfc3339(&self.timestamp)
            .map_err(|err| {
                return DeskError::Validation(format!(
                    "thread message timestamp is not RFC 3339: {err}"
                ));
            })?
            .timestamp_millis();

        return Ok(MirrorMessage {
            contact_id: contact_id.to_string(),
            message: self.content,
            timestamp,
            direction: self.direction,
        });
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadItems {
    pub items: Vec<ThreadMessage>,
}

/// Thread history responses come in two shapes for the same capability: the
/// usual `{resource: {items}}` envelope, and a bare `{items}` body. Both are
/// accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThreadResponse {
    Enveloped { resource: ThreadItems },
    Bare(ThreadItems),
}

impl ThreadResponse {
    pub fn into_items(self) -> Vec<ThreadMessage> {
        match self {
            ThreadResponse::Enveloped { resource } => return resource.items,
            ThreadResponse::Bare(body) => return body.items,
        }
    }
}
