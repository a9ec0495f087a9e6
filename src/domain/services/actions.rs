#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::CredentialStore;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Action;
use crate::domain::models::DeskError;
use crate::domain::models::Direction;
use crate::domain::models::Event;
use crate::domain::models::MirrorMessage;
use crate::infrastructure::gateway::Blip;
use crate::infrastructure::mirror::SqliteMirror;

fn worker_error(
    err: anyhow::Error,
    revision: u64,
    message: &str,
    tx: &mpsc::UnboundedSender<Event>,
) -> Result<()> {
    tracing::error!(error = ?err, "worker failed");
    tx.send(Event::WorkerError {
        revision,
        message: message.to_string(),
    })?;

    return Ok(());
}

/// Verifies the key and persists it on acceptance. The length window is
/// checked before any network call; gateway and storage failures both map to
/// the same generic rejection line.
async fn verify_and_store(
    gateway: &Blip,
    credentials: &mut CredentialStore,
    key: &str,
) -> Event {
    if let Err(err) = super::validate_key(key) {
        return Event::AuthRejected(match err.downcast_ref::<DeskError>() {
            Some(DeskError::Validation(reason)) => reason.to_string(),
            _ => "Erro na validação da chave.".to_string(),
        });
    }

    match gateway.verify_key().await {
        Ok(()) => match credentials.set_key(key) {
            Ok(()) => return Event::AuthAccepted(),
            Err(err) => {
                tracing::error!(error = ?err, "failed to persist credential");
                return Event::AuthRejected("Erro na validação da chave.".to_string());
            }
        },
        Err(err) => {
            tracing::warn!(error = ?err, "gateway rejected key");
            return Event::AuthRejected("Erro na validação da chave.".to_string());
        }
    }
}

/// The mirror is the authoritative conversation source. When a chat opens
/// with an empty mirror slice, the gateway thread history is imported once,
/// then the mirror is re-read.
async fn open_thread(
    gateway: &Blip,
    mirror: &SqliteMirror,
    contact_id: &str,
) -> Result<Vec<MirrorMessage>> {
    let local = mirror.list_by_contact(contact_id)?;
    if !local.is_empty() {
        return Ok(local);
    }

    let imported = gateway.list_thread_messages(contact_id).await?;
    tracing::debug!(
        contact_id = contact_id,
        count = imported.len(),
        "importing gateway thread history"
    );
    for item in imported {
        // The mirror rejects empty bodies; the gateway occasionally reports
        // them for media messages.
        if item.content.is_empty() {
            continue;
        }
        mirror.append(&item.into_mirror(contact_id)?)?;
    }

    return mirror.list_by_contact(contact_id);
}

pub struct ActionsService {}

impl ActionsService {
    pub async fn start(
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
        mut credentials: CredentialStore,
        mirror: SqliteMirror,
    ) -> Result<()> {
        // Lazy default.
        let mut worker: JoinHandle<Result<()>> = tokio::spawn(async {
            return Ok(());
        });

        loop {
            let action = rx.recv().await;
            if action.is_none() {
                continue;
            }

            let worker_tx = tx.clone();
            match action.unwrap() {
                Action::VerifyKey(key) => {
                    let gateway = Blip::new(&key);
                    tx.send(verify_and_store(&gateway, &mut credentials, &key).await)?;
                }
                Action::FetchContacts { revision, page } => {
                    worker.abort();
                    let gateway = Blip::new(credentials.get_key().unwrap_or_default());
                    let page_size = Config::get(ConfigKey::PageSize)
                        .parse::<u32>()
                        .unwrap_or(10);
                    worker = tokio::spawn(async move {
                        match gateway.list_contacts(page, page_size).await {
                            Ok(result) => {
                                worker_tx.send(Event::ContactsLoaded {
                                    revision,
                                    page: result,
                                })?;
                            }
                            Err(err) => {
                                worker_error(err, revision, "Erro ao buscar contatos.", &worker_tx)?;
                            }
                        }
                        return Ok(());
                    });
                }
                Action::OpenThread {
                    revision,
                    contact_id,
                } => {
                    worker.abort();
                    let gateway = Blip::new(credentials.get_key().unwrap_or_default());
                    let mirror = mirror.clone();
                    worker = tokio::spawn(async move {
                        match open_thread(&gateway, &mirror, &contact_id).await {
                            Ok(messages) => {
                                worker_tx.send(Event::ThreadLoaded {
                                    revision,
                                    contact_id,
                                    messages,
                                })?;
                            }
                            Err(err) => {
                                worker_error(
                                    err,
                                    revision,
                                    "Erro ao carregar mensagens.",
                                    &worker_tx,
                                )?;
                            }
                        }
                        return Ok(());
                    });
                }
                Action::StoreMessage {
                    revision,
                    contact_id,
                    text,
                } => {
                    // Sends are not routed through the fetch worker slot so a
                    // navigation cannot abort a write mid-flight.
                    let mirror = mirror.clone();
                    tokio::spawn(async move {
                        let message = MirrorMessage::new(&contact_id, &text, Direction::Sent);
                        match mirror.append(&message) {
                            Ok(()) => {
                                let _ = worker_tx.send(Event::MessageStored { revision, message });
                            }
                            Err(err) => {
                                tracing::error!(error = ?err, "failed to store message");
                                let _ = worker_tx.send(Event::WorkerError {
                                    revision,
                                    message: "Erro ao salvar a mensagem.".to_string(),
                                });
                            }
                        }
                    });
                }
                Action::Logout() => {
                    if let Err(err) = credentials.clear() {
                        tracing::error!(error = ?err, "failed to clear credential");
                    }
                    tx.send(Event::LoggedOut())?;
                }
            }
        }
    }
}
