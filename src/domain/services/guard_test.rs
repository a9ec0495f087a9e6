use super::Access;
use super::SessionGuard;
use crate::domain::models::Route;

#[test]
fn it_redirects_protected_routes_without_a_credential() {
    assert_eq!(
        SessionGuard::evaluate(&Route::Contacts, false),
        Access::Redirect(Route::Login)
    );
    assert_eq!(
        SessionGuard::evaluate(&Route::Chat("a@b.com".to_string()), false),
        Access::Redirect(Route::Login)
    );
}

#[test]
fn it_allows_protected_routes_with_a_credential_present() {
    assert_eq!(SessionGuard::evaluate(&Route::Contacts, true), Access::Allow);
    assert_eq!(
        SessionGuard::evaluate(&Route::Chat("a@b.com".to_string()), true),
        Access::Allow
    );
}

#[test]
fn it_always_allows_the_login_route() {
    assert_eq!(SessionGuard::evaluate(&Route::Login, false), Access::Allow);
    assert_eq!(SessionGuard::evaluate(&Route::Login, true), Access::Allow);
}
