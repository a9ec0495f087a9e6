#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;

use crate::domain::models::Route;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Allow,
    Redirect(Route),
}

pub struct SessionGuard {}

impl SessionGuard {
    /// Pure presence check, evaluated before a view renders. A stale but
    /// present key still passes; it only fails on the next gateway call.
    pub fn evaluate(route: &Route, credential_present: bool) -> Access {
        if route.is_protected() && !credential_present {
            return Access::Redirect(Route::Login);
        }

        return Access::Allow;
    }
}
