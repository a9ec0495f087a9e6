/// The three navigable views. `Chat` carries the selected contact identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Contacts,
    Chat(String),
}

impl Route {
    pub fn is_protected(&self) -> bool {
        return !matches!(self, Route::Login);
    }
}
