#[cfg(test)]
#[path = "contact_test.rs"]
mod tests;

use anyhow::Result;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::DeskError;

/// Contact identities on the gateway are email-shaped strings
/// (`local@domain.tld`). This is a shape check, not RFC 5321.
pub fn is_email_shaped(value: &str) -> bool {
    let mut parts = value.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();

    if local.is_empty() || domain.is_empty() {
        return false;
    }

    return domain.split('.').count() >= 2 && !domain.starts_with('.') && !domain.ends_with('.');
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub identity: String,
    pub name: String,
}

impl Contact {
    pub fn validate(&self) -> Result<()> {
        if !is_email_shaped(&self.identity) {
            return Err(DeskError::Validation(format!(
                "contact identity is not email-shaped: {}",
                self.identity
            ))
            .into());
        }
        if self.name.is_empty() {
            return Err(DeskError::Validation("contact name is empty".to_string()).into());
        }

        return Ok(());
    }
}

/// One page of the gateway contact listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactPage {
    pub items: Vec<Contact>,
    pub page: u32,
    pub total_pages: u32,
}

impl ContactPage {
    pub fn has_previous(&self) -> bool {
        return self.page > 1;
    }

    pub fn has_next(&self) -> bool {
        return self.page < self.total_pages;
    }
}
