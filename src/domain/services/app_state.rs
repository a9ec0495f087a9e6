#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use super::Access;
use super::SessionGuard;
use crate::domain::models::Action;
use crate::domain::models::Contact;
use crate::domain::models::ContactPage;
use crate::domain::models::MirrorMessage;
use crate::domain::models::Route;

/// The explicit session context threaded through guard and views. No
/// ambient global credential: the actions service owns the key itself, the
/// UI only tracks presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub authenticated: bool,
    pub selected_contact: Option<String>,
}

pub struct AppState {
    pub session: SessionContext,
    pub route: Route,
    pub revision: u64,
    pub contacts: Vec<Contact>,
    pub page: u32,
    pub total_pages: u32,
    pub selected: usize,
    pub messages: Vec<MirrorMessage>,
    pub error: Option<String>,
    pub loading: bool,
}

impl AppState {
    pub fn new(authenticated: bool) -> AppState {
        return AppState {
            session: SessionContext {
                authenticated,
                selected_contact: None,
            },
            route: Route::Login,
            revision: 0,
            contacts: vec![],
            page: 1,
            total_pages: 1,
            selected: 0,
            messages: vec![],
            error: None,
            loading: false,
        };
    }

    /// Routes through the guard and bumps the view revision so results from
    /// workers spawned for the previous view are dropped as stale.
    pub fn navigate(&mut self, route: Route) -> Option<Action> {
        let route = match SessionGuard::evaluate(&route, self.session.authenticated) {
            Access::Allow => route,
            Access::Redirect(to) => to,
        };

        self.revision += 1;
        self.error = None;
        self.loading = false;
        self.messages.clear();

        match route {
            Route::Login => {
                self.session.selected_contact = None;
                self.route = Route::Login;
                return None;
            }
            Route::Contacts => {
                self.session.selected_contact = None;
                self.page = 1;
                self.selected = 0;
                self.loading = true;
                self.route = Route::Contacts;
                return Some(Action::FetchContacts {
                    revision: self.revision,
                    page: self.page,
                });
            }
            Route::Chat(contact_id) => {
                self.session.selected_contact = Some(contact_id.to_string());
                self.loading = true;
                self.route = Route::Chat(contact_id.to_string());
                return Some(Action::OpenThread {
                    revision: self.revision,
                    contact_id,
                });
            }
        }
    }

    pub fn page_prev(&mut self) -> Option<Action> {
        if self.route != Route::Contacts || self.page <= 1 {
            return None;
        }

        self.page -= 1;
        return self.refetch_contacts();
    }

    pub fn page_next(&mut self) -> Option<Action> {
        if self.route != Route::Contacts || self.page >= self.total_pages {
            return None;
        }

        self.page += 1;
        return self.refetch_contacts();
    }

    fn refetch_contacts(&mut self) -> Option<Action> {
        self.revision += 1;
        self.selected = 0;
        self.loading = true;
        self.error = None;
        return Some(Action::FetchContacts {
            revision: self.revision,
            page: self.page,
        });
    }

    pub fn list_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn list_down(&mut self) {
        if !self.contacts.is_empty() && self.selected < self.contacts.len() - 1 {
            self.selected += 1;
        }
    }

    pub fn selected_contact(&self) -> Option<&Contact> {
        return self.contacts.get(self.selected);
    }

    /// Builds the send action for the chat input. The caller clears the
    /// input immediately after; a failed append loses the message
    /// (at-most-once).
    pub fn compose_send(&mut self, text: &str) -> Option<Action> {
        let contact_id = match &self.route {
            Route::Chat(contact_id) => contact_id.to_string(),
            _ => return None,
        };

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        return Some(Action::StoreMessage {
            revision: self.revision,
            contact_id,
            text: trimmed.to_string(),
        });
    }

    pub fn handle_auth_accepted(&mut self) -> Option<Action> {
        self.session.authenticated = true;
        self.loading = false;
        return self.navigate(Route::Contacts);
    }

    pub fn handle_auth_rejected(&mut self, reason: String) {
        self.loading = false;
        self.error = Some(reason);
    }

    pub fn handle_logged_out(&mut self) {
        self.session.authenticated = false;
        self.contacts.clear();
        self.navigate(Route::Login);
    }

    pub fn handle_contacts_loaded(&mut self, revision: u64, page: ContactPage) {
        if revision != self.revision {
            tracing::debug!(revision = revision, "dropping stale contacts result");
            return;
        }

        self.loading = false;
        self.page = page.page;
        self.total_pages = page.total_pages;
        self.contacts = page.items;
        self.selected = 0;
    }

    pub fn handle_thread_loaded(
        &mut self,
        revision: u64,
        contact_id: &str,
        messages: Vec<MirrorMessage>,
    ) {
        if revision != self.revision {
            tracing::debug!(revision = revision, contact_id = contact_id, "dropping stale thread result");
            return;
        }

        self.loading = false;
        self.messages = messages;
    }

    pub fn handle_message_stored(&mut self, revision: u64, message: MirrorMessage) {
        if revision != self.revision {
            tracing::debug!(revision = revision, "dropping stale stored message");
            return;
        }

        self.messages.push(message);
    }

    /// Every failure is terminal for the action that produced it: show a
    /// generic line and leave the previously rendered data untouched.
    pub fn handle_worker_error(&mut self, revision: u64, message: String) {
        if revision != self.revision {
            tracing::debug!(revision = revision, "dropping stale worker error");
            return;
        }

        self.loading = false;
        self.error = Some(message);
    }
}
