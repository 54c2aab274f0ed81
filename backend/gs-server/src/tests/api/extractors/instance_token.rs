use crate::{ApiError, InstanceTokenHeader};

use axum::{body::Body, extract::FromRequestParts, http::Request};
use googletest::assert_that;
use googletest::prelude::eq;

async fn extract(token: Option<&str>) -> Result<InstanceTokenHeader, ApiError> {
    let mut builder = Request::builder();
    if let Some(value) = token {
        builder = builder.header("X-Instance-Token", value);
    }
    let (mut parts, _body) = builder.body(Body::empty()).unwrap().into_parts();
    InstanceTokenHeader::from_request_parts(&mut parts, &()).await
}

#[tokio::test]
async fn given_token_header_when_extracted_then_trimmed_value() {
    // When
    let result = extract(Some("  s3cret ")).await;

    // Then
    assert_that!(result.unwrap().0, eq("s3cret"));
}

#[tokio::test]
async fn given_no_token_header_when_extracted_then_unauthorized() {
    // When
    let result = extract(None).await;

    // Then
    let Err(error) = result else {
        panic!("expected rejection");
    };
    assert_that!(error.code(), eq("MISSING_INSTANCE_TOKEN"));
}

#[tokio::test]
async fn given_blank_token_header_when_extracted_then_unauthorized() {
    // When
    let result = extract(Some("   ")).await;

    // Then
    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}
