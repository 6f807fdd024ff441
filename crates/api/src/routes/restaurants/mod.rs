//! "My restaurant" route handlers.

pub mod form;

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
};

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::Restaurant;
use crate::services::restaurants;
use crate::state::AppState;

use form::RestaurantForm;

/// Create the caller's restaurant from a multipart submission.
///
/// # Errors
///
/// See the response table on [`AppError`]; 409 if the caller already owns a
/// restaurant, 400 for a missing or unsupported image, 500 if the upload or
/// the insert fails.
pub async fn create_my_restaurant(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<Restaurant>)> {
    let multipart = multipart.map_err(|e| AppError::InvalidForm(e.body_text()))?;
    let form = RestaurantForm::from_multipart(multipart).await?;

    let restaurant = restaurants::create_restaurant(
        state.restaurants(),
        state.images(),
        user.id,
        form.fields,
        form.image,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(restaurant)))
}

/// Return the caller's restaurant.
///
/// # Errors
///
/// 404 if the caller has none, 500 if the lookup fails.
pub async fn get_my_restaurant(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Restaurant>> {
    let restaurant = restaurants::get_restaurant(state.restaurants(), &user.id).await?;
    Ok(Json(restaurant))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use chrono::{DateTime, Utc};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use forkful_core::UserId;

    use crate::routes::router;
    use crate::test_support::{InMemoryRestaurantStore, StubImageStore, test_config};

    const BOUNDARY: &str = "forkful-test-boundary";

    struct Harness {
        store: Arc<InMemoryRestaurantStore>,
        images: Arc<StubImageStore>,
        app: axum::Router,
    }

    fn harness(store: InMemoryRestaurantStore, images: StubImageStore) -> Harness {
        let store = Arc::new(store);
        let images = Arc::new(images);
        let state = crate::state::AppState::new(test_config(), store.clone(), images.clone());
        Harness {
            store,
            images,
            app: router(state),
        }
    }

    enum Part<'a> {
        Text(&'a str, &'a str),
        File {
            name: &'a str,
            file_name: &'a str,
            content_type: &'a str,
            bytes: &'a [u8],
        },
    }

    fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File {
                    name,
                    file_name,
                    content_type,
                    bytes,
                } => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(bytes);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn create_request(user: Option<&str>, parts: &[Part<'_>]) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/my/restaurant")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            );
        if let Some(user) = user {
            builder = builder.header("x-user-id", user);
        }
        builder.body(Body::from(multipart_body(parts))).unwrap()
    }

    fn png_part() -> Part<'static> {
        Part::File {
            name: "imageFile",
            file_name: "cafe.png",
            content_type: "image/png",
            bytes: &[0x89, b'P', b'N', b'G'],
        }
    }

    async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_create_success() {
        let h = harness(
            InMemoryRestaurantStore::default(),
            StubImageStore::succeeding("https://img/abc"),
        );
        let started = Utc::now();

        let request = create_request(
            Some("U1"),
            &[
                Part::Text("name", "Cafe X"),
                Part::Text("cuisines[0]", "Thai"),
                Part::Text("cuisines[1]", "Indian"),
                png_part(),
            ],
        );
        let (status, body) = send(h.app, request).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["name"], json!("Cafe X"));
        assert_eq!(body["cuisines"], json!(["Thai", "Indian"]));
        assert_eq!(body["imageUrl"], json!("https://img/abc"));
        assert_eq!(body["user"], json!("U1"));
        assert!(body["_id"].is_string());

        let last_updated: DateTime<Utc> = body["lastUpdated"].as_str().unwrap().parse().unwrap();
        assert!(last_updated >= started);

        assert_eq!(h.images.uploads(), vec!["data:image/png;base64,iVBORw==".to_string()]);
        assert_eq!(h.store.insert_calls(), 1);
    }

    #[tokio::test]
    async fn test_create_ignores_forged_server_fields() {
        let h = harness(
            InMemoryRestaurantStore::default(),
            StubImageStore::succeeding("https://img/abc"),
        );

        let request = create_request(
            Some("U1"),
            &[
                Part::Text("user", "U2"),
                Part::Text("imageUrl", "https://evil/img"),
                png_part(),
            ],
        );
        let (status, body) = send(h.app, request).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["user"], json!("U1"));
        assert_eq!(body["imageUrl"], json!("https://img/abc"));
    }

    #[tokio::test]
    async fn test_create_conflict() {
        let store = InMemoryRestaurantStore::default();
        store.seed(&UserId::parse("U1").unwrap());
        let h = harness(store, StubImageStore::succeeding("https://img/abc"));

        let (status, body) = send(h.app, create_request(Some("U1"), &[png_part()])).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, json!({ "message": "User restaurant already exists" }));
        assert!(h.images.uploads().is_empty());
        assert_eq!(h.store.insert_calls(), 0);
    }

    #[tokio::test]
    async fn test_create_missing_image() {
        let h = harness(
            InMemoryRestaurantStore::default(),
            StubImageStore::succeeding("https://img/abc"),
        );

        let request = create_request(Some("U1"), &[Part::Text("name", "Cafe X")]);
        let (status, body) = send(h.app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "message": "Image file is required" }));
        assert!(h.images.uploads().is_empty());
        assert_eq!(h.store.insert_calls(), 0);
    }

    #[tokio::test]
    async fn test_create_empty_file_input_counts_as_missing() {
        let h = harness(
            InMemoryRestaurantStore::default(),
            StubImageStore::succeeding("https://img/abc"),
        );

        let request = create_request(
            Some("U1"),
            &[Part::File {
                name: "imageFile",
                file_name: "",
                content_type: "application/octet-stream",
                bytes: &[],
            }],
        );
        let (status, body) = send(h.app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "message": "Image file is required" }));
    }

    #[tokio::test]
    async fn test_create_invalid_image_type() {
        let h = harness(
            InMemoryRestaurantStore::default(),
            StubImageStore::succeeding("https://img/abc"),
        );

        let request = create_request(
            Some("U1"),
            &[Part::File {
                name: "imageFile",
                file_name: "cafe.webp",
                content_type: "image/webp",
                bytes: b"RIFF",
            }],
        );
        let (status, body) = send(h.app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "message": "Invalid image type" }));
        assert!(h.images.uploads().is_empty());
        assert_eq!(h.store.insert_calls(), 0);
    }

    #[tokio::test]
    async fn test_create_upload_failure() {
        let h = harness(InMemoryRestaurantStore::default(), StubImageStore::failing());

        let (status, body) = send(h.app, create_request(Some("U1"), &[png_part()])).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "message": "Failed to upload image" }));
        assert_eq!(h.images.uploads().len(), 1);
        assert_eq!(h.store.insert_calls(), 0);
    }

    #[tokio::test]
    async fn test_create_persistence_failure() {
        let h = harness(
            InMemoryRestaurantStore::failing_inserts(),
            StubImageStore::succeeding("https://img/abc"),
        );

        let (status, body) = send(h.app, create_request(Some("U1"), &[png_part()])).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "message": "Something went wrong." }));
        assert_eq!(h.images.uploads().len(), 1);
        assert_eq!(h.store.insert_calls(), 1);
    }

    #[tokio::test]
    async fn test_create_lookup_failure() {
        let h = harness(
            InMemoryRestaurantStore::failing_lookups(),
            StubImageStore::succeeding("https://img/abc"),
        );

        let (status, body) = send(h.app, create_request(Some("U1"), &[png_part()])).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "message": "Something went wrong." }));
        assert!(h.images.uploads().is_empty());
    }

    #[tokio::test]
    async fn test_create_requires_identity() {
        let h = harness(
            InMemoryRestaurantStore::default(),
            StubImageStore::succeeding("https://img/abc"),
        );

        let (status, body) = send(h.app, create_request(None, &[png_part()])).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "message": "Unauthorized" }));
        assert_eq!(h.store.lookup_calls(), 0);
    }

    #[tokio::test]
    async fn test_create_rejects_non_multipart_body() {
        let h = harness(
            InMemoryRestaurantStore::default(),
            StubImageStore::succeeding("https://img/abc"),
        );

        let request = Request::builder()
            .method("POST")
            .uri("/api/my/restaurant")
            .header("x-user-id", "U1")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name":"Cafe X"}"#))
            .unwrap();
        let (status, body) = send(h.app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "message": "Invalid form data" }));
        assert_eq!(h.store.lookup_calls(), 0);
    }

    #[tokio::test]
    async fn test_create_rejects_oversized_body() {
        let h = harness(
            InMemoryRestaurantStore::default(),
            StubImageStore::succeeding("https://img/abc"),
        );
        let big = vec![0_u8; test_config().max_upload_bytes + 1];

        let request = create_request(
            Some("U1"),
            &[Part::File {
                name: "imageFile",
                file_name: "huge.png",
                content_type: "image/png",
                bytes: &big,
            }],
        );
        let (status, body) = send(h.app, request).await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body, json!({ "message": "Image file is too large" }));
        assert!(h.images.uploads().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_deeply_nested_field_name() {
        let h = harness(
            InMemoryRestaurantStore::default(),
            StubImageStore::succeeding("https://img/abc"),
        );
        let name = format!("a{}", "[0]".repeat(2000));

        let request = create_request(Some("U1"), &[Part::Text(&name, "x"), png_part()]);
        let (status, body) = send(h.app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "message": "Invalid form data" }));
        assert_eq!(h.store.lookup_calls(), 0);
        assert!(h.images.uploads().is_empty());
    }

    #[tokio::test]
    async fn test_create_malformed_form_from_existing_owner_is_bad_request() {
        let store = InMemoryRestaurantStore::default();
        store.seed(&UserId::parse("U1").unwrap());
        let h = harness(store, StubImageStore::succeeding("https://img/abc"));

        let second_image = Part::File {
            name: "imageFile",
            file_name: "other.png",
            content_type: "image/png",
            bytes: &[0x89, b'P', b'N', b'G'],
        };
        let stray_file = Part::File {
            name: "menu",
            file_name: "menu.pdf",
            content_type: "application/pdf",
            bytes: b"%PDF",
        };

        for parts in [
            vec![png_part(), second_image],
            vec![png_part(), stray_file],
            vec![Part::Text("cuisines[256]", "Thai"), png_part()],
        ] {
            let request = create_request(Some("U1"), &parts);
            let (status, body) = send(h.app.clone(), request).await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({ "message": "Invalid form data" }));
        }
        assert_eq!(h.store.lookup_calls(), 0);
        assert_eq!(h.store.insert_calls(), 0);
    }

    #[tokio::test]
    async fn test_get_my_restaurant() {
        let store = InMemoryRestaurantStore::default();
        let seeded = store.seed(&UserId::parse("U1").unwrap());
        let h = harness(store, StubImageStore::succeeding("https://img/abc"));

        let request = Request::builder()
            .uri("/api/my/restaurant")
            .header("x-user-id", "U1")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(h.app.clone(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::to_value(&seeded).unwrap());

        let request = Request::builder()
            .uri("/api/my/restaurant")
            .header("x-user-id", "U2")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(h.app, request).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "message": "restaurant not found" }));
    }
}
