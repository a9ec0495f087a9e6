#[cfg(test)]
#[path = "blip_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::Result;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::CommandRequest;
use crate::domain::models::CommandTarget;
use crate::domain::models::ContactPage;
use crate::domain::models::ContactsResponse;
use crate::domain::models::DeskError;
use crate::domain::models::ThreadMessage;
use crate::domain::models::ThreadResponse;

/// Client for the gateway command endpoint. Every operation is a single
/// authenticated POST to `{url}/commands`; failures are terminal for the
/// user action that triggered them, never retried.
pub struct Blip {
    url: String,
    api_key: String,
    timeout: String,
}

impl Blip {
    pub fn new(api_key: &str) -> Blip {
        return Blip::with_base_url(&Config::get(ConfigKey::GatewayURL), api_key);
    }

    pub fn with_base_url(url: &str, api_key: &str) -> Blip {
        return Blip {
            url: url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            timeout: Config::get(ConfigKey::GatewayTimeout),
        };
    }

    async fn command(&self, target: CommandTarget, uri: &str) -> Result<serde_json::Value> {
        let req = CommandRequest::get(target, uri);
        let res = reqwest::Client::new()
            .post(format!("{url}/commands", url = self.url))
            .header("Authorization", format!("Key {}", self.api_key))
            .timeout(Duration::from_millis(
                self.timeout.parse::<u64>().unwrap_or(10_000),
            ))
            .json(&req)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            tracing::error!(status = status.as_u16(), uri = uri, "gateway command failed");
            return Err(DeskError::Gateway {
                status: status.as_u16(),
                reason: status
                    .canonical_reason()
                    .unwrap_or("unknown status")
                    .to_string(),
            }
            .into());
        }

        return Ok(res.json::<serde_json::Value>().await?);
    }

    /// A 2xx on the desk-target contact listing means the key is accepted.
    pub async fn verify_key(&self) -> Result<()> {
        self.command(CommandTarget::Desk, "/contacts").await?;
        return Ok(());
    }

    /// CRM contact pagination via skip/take. A shape mismatch (including a
    /// missing `total`) discards the whole payload.
    pub async fn list_contacts(&self, page: u32, page_size: u32) -> Result<ContactPage> {
        let skip = page.saturating_sub(1) * page_size;
        let uri = format!("/contacts?$skip={skip}&$take={page_size}");

        let raw = self.command(CommandTarget::Crm, &uri).await?;
        let parsed: ContactsResponse = serde_json::from_value(raw).map_err(|err| {
            return DeskError::Validation(format!("contacts response shape mismatch: {err}"));
        })?;

        for contact in &parsed.resource.items {
            contact.validate()?;
        }

        // Saturate rather than trust an absurd `total` from the gateway.
        let total_pages = (parsed
            .resource
            .total
            .saturating_add(u64::from(page_size) - 1)
            / u64::from(page_size))
        .max(1);

        return Ok(ContactPage {
            items: parsed.resource.items,
            page,
            total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
        });
    }

    /// CRM thread history for one contact. Accepts both observed response
    /// shapes, enveloped and bare.
    pub async fn list_thread_messages(&self, contact_id: &str) -> Result<Vec<ThreadMessage>> {
        let uri = format!("/threads/{contact_id}/messages");

        let raw = self.command(CommandTarget::Crm, &uri).await?;
        let parsed: ThreadResponse = serde_json::from_value(raw).map_err(|err| {
            return DeskError::Validation(format!("thread response shape mismatch: {err}"));
        })?;

        return Ok(parsed.into_items());
    }
}
