use crate::ApiError;

use gs_auth::AuthError;
use gs_core::InstanceKey;
use gs_supervisor::SupervisorError;

use std::panic::Location;

use axum::response::IntoResponse;
use error_location::ErrorLocation;
use googletest::assert_that;
use googletest::prelude::eq;
use http::StatusCode;
use http_body_util::BodyExt;

async fn body_json(error: ApiError) -> (StatusCode, serde_json::Value) {
    let response = error.into_response();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn given_not_found_when_into_response_then_404_with_json_body() {
    // Given
    let error = ApiError::NotFound {
        message: "Instance 'arena' not found".into(),
        location: ErrorLocation::from(Location::caller()),
    };

    // When
    let (status, json) = body_json(error).await;

    // Then
    assert_that!(status, eq(StatusCode::NOT_FOUND));
    assert_eq!(json["error"]["code"], "NOT_FOUND");
    assert_eq!(json["error"]["message"], "Instance 'arena' not found");
}

#[tokio::test]
async fn given_unknown_instance_when_converted_then_not_found() {
    // Given
    let error: ApiError = SupervisorError::unknown_instance("arena").into();

    // When
    let (status, json) = body_json(error).await;

    // Then
    assert_that!(status, eq(StatusCode::NOT_FOUND));
    assert!(json["error"]["message"].as_str().unwrap().contains("arena"));
}

#[tokio::test]
async fn given_rejected_instance_token_when_converted_then_401() {
    // Given
    let error: ApiError = SupervisorError::InvalidToken {
        key: InstanceKey::new("arena").unwrap(),
        location: ErrorLocation::from(Location::caller()),
    }
    .into();

    // When
    let (status, json) = body_json(error).await;

    // Then
    assert_that!(status, eq(StatusCode::UNAUTHORIZED));
    assert_eq!(json["error"]["code"], "INVALID_INSTANCE_TOKEN");
}

#[tokio::test]
async fn given_stopped_supervisor_when_converted_then_503() {
    // Given
    let error: ApiError = SupervisorError::Unavailable {
        key: InstanceKey::new("arena").unwrap(),
        location: ErrorLocation::from(Location::caller()),
    }
    .into();

    // When
    let (status, json) = body_json(error).await;

    // Then
    assert_that!(status, eq(StatusCode::SERVICE_UNAVAILABLE));
    assert_eq!(json["error"]["code"], "UNAVAILABLE");
}

#[tokio::test]
async fn given_internal_supervisor_failure_when_converted_then_details_hidden() {
    // Given
    let error: ApiError = SupervisorError::update("manifest at http://10.0.0.9 returned 500").into();

    // When
    let (status, json) = body_json(error).await;

    // Then
    assert_that!(status, eq(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(json["error"]["code"], "INTERNAL_ERROR");
    assert!(!json["error"]["message"].as_str().unwrap().contains("10.0.0.9"));
}

#[tokio::test]
async fn given_missing_auth_header_when_converted_then_401_with_auth_code() {
    // Given
    let error: ApiError = AuthError::MissingHeader {
        location: ErrorLocation::from(Location::caller()),
    }
    .into();

    // When
    let (status, json) = body_json(error).await;

    // Then
    assert_that!(status, eq(StatusCode::UNAUTHORIZED));
    assert_eq!(json["error"]["code"], "MISSING_AUTH_HEADER");
}

#[tokio::test]
async fn given_forbidden_auth_error_when_converted_then_403() {
    // Given
    let error: ApiError = AuthError::Forbidden {
        message: "'ops-1' lacks the 'operator' role".into(),
        location: ErrorLocation::from(Location::caller()),
    }
    .into();

    // When
    let (status, json) = body_json(error).await;

    // Then
    assert_that!(status, eq(StatusCode::FORBIDDEN));
    assert_eq!(json["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn given_bad_request_when_into_response_then_400() {
    // Given
    let error = ApiError::BadRequest {
        message: "reason too long".into(),
        location: ErrorLocation::from(Location::caller()),
    };

    // When
    let (status, json) = body_json(error).await;

    // Then
    assert_that!(status, eq(StatusCode::BAD_REQUEST));
    assert_eq!(json["error"]["code"], "BAD_REQUEST");
}
