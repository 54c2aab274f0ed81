use crate::tests::{bearer, empty_state, operator_bearer};
use crate::{ApiError, Operator};

use axum::{body::Body, extract::FromRequestParts, http::Request};
use googletest::assert_that;
use googletest::prelude::{eq, none, some};

fn request(authorization: Option<&str>) -> http::request::Parts {
    let mut builder = Request::builder();
    if let Some(value) = authorization {
        builder = builder.header("Authorization", value);
    }
    builder.body(Body::empty()).unwrap().into_parts().0
}

#[tokio::test]
async fn given_auth_disabled_when_extracted_then_anonymous_operator() {
    // Given
    let state = empty_state(false).await;
    let mut parts = request(None);

    // When
    let operator = Operator::from_request_parts(&mut parts, &state)
        .await
        .unwrap();

    // Then
    assert!(operator.0.is_none());
    assert_that!(operator.subject(), eq("anonymous"));
}

#[tokio::test]
async fn given_operator_token_when_extracted_then_claims_available() {
    // Given
    let state = empty_state(true).await;
    let token = operator_bearer();
    let mut parts = request(Some(&token));

    // When
    let operator = Operator::from_request_parts(&mut parts, &state)
        .await
        .unwrap();

    // Then
    assert_that!(operator.0.as_ref().map(|c| c.sub.as_str()), some(eq("ops-1")));
    assert_that!(operator.subject(), eq("ops-1"));
}

#[tokio::test]
async fn given_auth_enabled_and_no_header_when_extracted_then_unauthorized() {
    // Given
    let state = empty_state(true).await;
    let mut parts = request(None);

    // When
    let result = Operator::from_request_parts(&mut parts, &state).await;

    // Then
    let Err(error) = result else {
        panic!("expected rejection");
    };
    assert!(matches!(error, ApiError::Unauthorized { .. }));
    assert_that!(error.code(), eq("MISSING_AUTH_HEADER"));
}

#[tokio::test]
async fn given_basic_scheme_when_extracted_then_invalid_scheme() {
    // Given
    let state = empty_state(true).await;
    let mut parts = request(Some("Basic b3BzOnNlY3JldA=="));

    // When
    let result = Operator::from_request_parts(&mut parts, &state).await;

    // Then
    let Err(error) = result else {
        panic!("expected rejection");
    };
    assert_that!(error.code(), eq("INVALID_AUTH_SCHEME"));
}

#[tokio::test]
async fn given_token_without_operator_role_when_extracted_then_forbidden() {
    // Given
    let state = empty_state(true).await;
    let token = bearer(&["viewer"]);
    let mut parts = request(Some(&token));

    // When
    let result = Operator::from_request_parts(&mut parts, &state).await;

    // Then
    assert!(matches!(result, Err(ApiError::Forbidden { .. })));
}

#[tokio::test]
async fn given_auth_disabled_when_bogus_header_sent_then_still_anonymous() {
    // Given
    let state = empty_state(false).await;
    let mut parts = request(Some("Bearer not-a-jwt"));

    // When
    let operator = Operator::from_request_parts(&mut parts, &state)
        .await
        .unwrap();

    // Then
    assert_that!(operator.0.as_ref().map(|c| c.sub.clone()), none());
}
