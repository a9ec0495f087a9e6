use anyhow::Result;
use serde_json::json;

use super::Blip;
use crate::domain::models::DeskError;
use crate::domain::models::Direction;

fn client(url: &str) -> Blip {
    return Blip::with_base_url(url, "abcdefghij");
}

#[tokio::test]
async fn it_verifies_keys_against_the_desk_target() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/commands")
        .match_header("Authorization", "Key abcdefghij")
        .match_body(mockito::Matcher::PartialJson(json!({
            "to": "postmaster@desk.msging.net",
            "method": "get",
            "uri": "/contacts",
        })))
        .with_status(200)
        .with_body(r#"{"status": "success"}"#)
        .create();

    client(&server.url()).verify_key().await?;
    mock.assert();

    return Ok(());
}

#[tokio::test]
async fn it_fails_verification_on_unauthorized() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/commands")
        .with_status(401)
        .create();

    let err = client(&server.url()).verify_key().await.unwrap_err();
    mock.assert();

    match err.downcast_ref::<DeskError>() {
        Some(DeskError::Gateway { status, .. }) => assert_eq!(*status, 401),
        _ => panic!("expected a gateway error"),
    }
}

#[tokio::test]
async fn it_lists_contacts_with_skip_take_pagination() -> Result<()> {
    let body = json!({
        "resource": {
            "items": [
                {"identity": "ana@empresa.com", "name": "Ana"},
                {"identity": "bruno@empresa.com", "name": "Bruno"},
            ],
            "total": 25,
        }
    });

    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/commands")
        .match_header("Authorization", "Key abcdefghij")
        .match_body(mockito::Matcher::PartialJson(json!({
            "to": "postmaster@crm.msging.net",
            "uri": "/contacts?$skip=10&$take=10",
        })))
        .with_status(200)
        .with_body(body.to_string())
        .create();

    let page = client(&server.url()).list_contacts(2, 10).await?;
    mock.assert();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.page, 2);
    assert_eq!(page.total_pages, 3);
    assert!(page.has_previous());
    assert!(page.has_next());

    return Ok(());
}

#[tokio::test]
async fn it_rejects_contact_responses_missing_total() {
    let body = json!({
        "resource": {
            "items": [{"identity": "ana@empresa.com", "name": "Ana"}],
        }
    });

    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/commands")
        .with_status(200)
        .with_body(body.to_string())
        .create();

    let err = client(&server.url()).list_contacts(1, 10).await.unwrap_err();
    mock.assert();

    assert!(err
        .downcast_ref::<DeskError>()
        .is_some_and(|desk_err| return desk_err.is_validation()));
}

#[tokio::test]
async fn it_rejects_contacts_with_malformed_identities() {
    let body = json!({
        "resource": {
            "items": [{"identity": "not-an-email", "name": "Ana"}],
            "total": 1,
        }
    });

    let mut server = mockito::Server::new();
    server
        .mock("POST", "/commands")
        .with_status(200)
        .with_body(body.to_string())
        .create();

    let res = client(&server.url()).list_contacts(1, 10).await;
    assert!(res.is_err());
}

#[tokio::test]
async fn it_lists_thread_messages_from_the_enveloped_shape() -> Result<()> {
    let body = json!({
        "resource": {
            "items": [
                {"direction": "received", "content": "oi", "timestamp": "2024-02-01T12:00:00Z"},
                {"direction": "sent", "content": "olá!", "timestamp": "2024-02-01T12:01:00Z"},
            ]
        }
    });

    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/commands")
        .match_body(mockito::Matcher::PartialJson(json!({
            "to": "postmaster@crm.msging.net",
            "uri": "/threads/a@b.com/messages",
        })))
        .with_status(200)
        .with_body(body.to_string())
        .create();

    let messages = client(&server.url()).list_thread_messages("a@b.com").await?;
    mock.assert();

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].direction, Direction::Received);
    assert_eq!(messages[1].content, "olá!");

    return Ok(());
}

#[tokio::test]
async fn it_lists_thread_messages_from_the_bare_shape() -> Result<()> {
    let body = json!({
        "items": [
            {"direction": "received", "content": "oi", "timestamp": "2024-02-01T12:00:00Z"},
        ]
    });

    let mut server = mockito::Server::new();
    server
        .mock("POST", "/commands")
        .with_status(200)
        .with_body(body.to_string())
        .create();

    let messages = client(&server.url()).list_thread_messages("a@b.com").await?;
    assert_eq!(messages.len(), 1);

    return Ok(());
}

#[tokio::test]
async fn it_rejects_thread_responses_with_unknown_shapes() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/commands")
        .with_status(200)
        .with_body(r#"{"resource": {"messages": []}}"#)
        .create();

    let err = client(&server.url())
        .list_thread_messages("a@b.com")
        .await
        .unwrap_err();

    assert!(err
        .downcast_ref::<DeskError>()
        .is_some_and(|desk_err| return desk_err.is_validation()));
}

#[tokio::test]
async fn it_saturates_page_counts_for_absurd_totals() -> Result<()> {
    let body = json!({
        "resource": {
            "items": [{"identity": "ana@empresa.com", "name": "Ana"}],
            "total": u64::MAX,
        }
    });

    let mut server = mockito::Server::new();
    server
        .mock("POST", "/commands")
        .with_status(200)
        .with_body(body.to_string())
        .create();

    let page = client(&server.url()).list_contacts(1, 10).await?;
    assert_eq!(page.total_pages, u32::MAX);

    return Ok(());
}
