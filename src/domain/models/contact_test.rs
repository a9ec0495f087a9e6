use super::is_email_shaped;
use super::Contact;
use super::ContactPage;

#[test]
fn it_accepts_email_shaped_identities() {
    assert!(is_email_shaped("a@b.com"));
    assert!(is_email_shaped("suporte+fila@empresa.com.br"));
}

#[test]
fn it_rejects_identities_that_are_not_email_shaped() {
    assert!(!is_email_shaped(""));
    assert!(!is_email_shaped("no-at-sign"));
    assert!(!is_email_shaped("@missing-local.com"));
    assert!(!is_email_shaped("missing-domain@"));
    assert!(!is_email_shaped("bare@tld"));
    assert!(!is_email_shaped("dot@.leading"));
    assert!(!is_email_shaped("dot@trailing."));
}

#[test]
fn it_validates_contacts() {
    let contact = Contact {
        identity: "a@b.com".to_string(),
        name: "Ana".to_string(),
    };
    assert!(contact.validate().is_ok());

    let nameless = Contact {
        identity: "a@b.com".to_string(),
        name: "".to_string(),
    };
    assert!(nameless.validate().is_err());

    let bad_identity = Contact {
        identity: "not-an-email".to_string(),
        name: "Ana".to_string(),
    };
    assert!(bad_identity.validate().is_err());
}

#[test]
fn it_derives_pagination_enablement() {
    let page = ContactPage {
        items: vec![],
        page: 2,
        total_pages: 3,
    };

    assert!(page.has_previous());
    assert!(page.has_next());

    let first = ContactPage {
        items: vec![],
        page: 1,
        total_pages: 1,
    };

    assert!(!first.has_previous());
    assert!(!first.has_next());
}
