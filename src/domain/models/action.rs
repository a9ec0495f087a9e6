/// Requests sent from the UI to the actions service. Fetches carry the view
/// revision they were issued for; results delivered with a stale revision are
/// dropped by the app state.
pub enum Action {
    VerifyKey(String),
    FetchContacts { revision: u64, page: u32 },
    OpenThread { revision: u64, contact_id: String },
    StoreMessage { revision: u64, contact_id: String, text: String },
    Logout(),
}
