mod common;

use common::{sealed, spawn_gists, unsealed, FakeGists, GOOD_TOKEN};
use gistgrid::database::MemoryPreferences;
use gistgrid::error::Error;
use gistgrid::models::Cell;
use gistgrid::remote::{GistClient, RemoteStore, DEFAULT_FILE_NAME};
use gistgrid::session::{Credentials, Outcome, Session};
use serde_json::json;

async fn client_for(fake: &FakeGists) -> GistClient {
    let base = spawn_gists(fake.clone()).await;
    GistClient::new(&base, DEFAULT_FILE_NAME).unwrap()
}

#[tokio::test]
async fn fetch_returns_file_content() {
    let fake = FakeGists::holding("QUJD".into());
    let client = client_for(&fake).await;
    assert_eq!(client.fetch("abc").await.unwrap(), "QUJD");
}

#[tokio::test]
async fn fetch_of_unknown_gist_is_a_transport_error() {
    let client = client_for(&FakeGists::default()).await;
    assert!(matches!(client.fetch("abc").await, Err(Error::Transport(_))));
}

#[tokio::test]
async fn fetch_without_blob_file_is_a_format_error() {
    let client = client_for(&FakeGists::holding("QUJD".into())).await;
    assert!(matches!(
        client.fetch("no-file").await,
        Err(Error::RemoteFormat(_))
    ));
}

#[tokio::test]
async fn fetch_of_non_json_body_is_a_format_error() {
    let client = client_for(&FakeGists::holding("QUJD".into())).await;
    assert!(matches!(
        client.fetch("not-json").await,
        Err(Error::RemoteFormat(_))
    ));
}

#[tokio::test]
async fn hostile_gist_ids_never_leave_the_client() {
    let fake = FakeGists::holding("QUJD".into());
    let client = client_for(&fake).await;

    let err = client
        .patch("../user/repos", "x", GOOD_TOKEN)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidGistId(_)));
    for id in ["abc?x=1#frag", "abc/comments", ".."] {
        assert!(matches!(
            client.fetch(id).await,
            Err(Error::InvalidGistId(_))
        ));
    }
    assert!(fake.strays().is_empty(), "{:?}", fake.strays());
    assert_eq!(fake.content().as_deref(), Some("QUJD"));
}

#[tokio::test]
async fn fetch_from_unreachable_host_is_a_transport_error() {
    let client = GistClient::new("http://127.0.0.1:1/gists", DEFAULT_FILE_NAME).unwrap();
    assert!(matches!(client.fetch("abc").await, Err(Error::Transport(_))));
}

#[tokio::test]
async fn patch_sends_expected_body() {
    let fake = FakeGists::default();
    let client = client_for(&fake).await;
    client.patch("abc", "QUJD", GOOD_TOKEN).await.unwrap();
    assert_eq!(
        fake.last_patch().unwrap(),
        json!({
            "description": "gist",
            "public": true,
            "files": {"file1.txt": {"content": "QUJD"}}
        })
    );
}

#[tokio::test]
async fn refresh_happy_path() {
    let fake = FakeGists::holding(sealed(r#"[["a","b"]]"#, "secret"));
    let session = Session::new(client_for(&fake).await, MemoryPreferences::default(), 6);

    let outcome = session
        .refresh(&Credentials::new("secret", "", "abc"))
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Completed);
    assert_eq!(
        session.snapshot().rows(),
        &[vec![Cell::from("a"), Cell::from("b")]]
    );
}

#[tokio::test]
async fn upload_with_rejected_token_reports_transport_error() {
    let fake = FakeGists::holding(sealed("[]", "secret"));
    let session = Session::new(client_for(&fake).await, MemoryPreferences::default(), 6);
    session.add_row();

    let err = session
        .upload(&Credentials::new("secret", "bad-token", "abc"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport(msg) if msg.contains("401")));
    assert!(!session.is_busy());
    assert_eq!(unsealed(&fake.content().unwrap(), "secret"), json!([]));
}

#[tokio::test]
async fn upload_stores_encrypted_grid() {
    let fake = FakeGists::default();
    let session = Session::new(client_for(&fake).await, MemoryPreferences::default(), 6);
    session.add_row();
    session.edit_cell(0, 2, Cell::from("x")).unwrap();

    session
        .upload(&Credentials::new("secret", GOOD_TOKEN, "abc"))
        .await
        .unwrap();
    let stored = fake.content().unwrap();
    assert_eq!(
        unsealed(&stored, "secret"),
        json!([[null, null, "x", null, null, null]])
    );
}
