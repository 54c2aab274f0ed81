use crate::Client;

#[test]
fn given_trailing_slash_when_client_created_then_trimmed() {
    let client = Client::new("http://localhost:8700/", None);
    assert_eq!(client.base_url, "http://localhost:8700");
}

#[test]
fn given_no_trailing_slash_when_client_created_then_unchanged() {
    let client = Client::new("http://localhost:8700", None);
    assert_eq!(client.base_url, "http://localhost:8700");
}

#[test]
fn given_token_when_client_created_then_stored() {
    let client = Client::new("http://localhost:8700", Some("jwt-123"));
    assert_eq!(client.token, Some("jwt-123".to_string()));
}

#[test]
fn given_no_token_when_client_created_then_none() {
    let client = Client::new("http://localhost:8700", None);
    assert!(client.token.is_none());
}
