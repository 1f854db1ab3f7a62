//! User resource endpoints

use axum::{
    extract::{OriginalUri, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, Path, Query, UserDto};
use crate::domain::user::{User, UserId};

/// Query for `GET /users/filter`
#[derive(Debug, Clone, Deserialize)]
pub struct FilterQuery {
    pub name: String,
}

/// Create the user resource router
pub fn create_users_router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/filter", get(filter_users))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}

fn to_dtos(users: &[User]) -> Vec<UserDto> {
    users.iter().map(UserDto::from).collect()
}

/// GET /users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserDto>>, ApiError> {
    debug!("Listing users");

    let users = state.user_service.get_all().await?;

    Ok(Json(to_dtos(&users)))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserDto>, ApiError> {
    debug!(id, "Getting user");

    let user = state.user_service.get_by_id(UserId::new(id)).await?;

    Ok(Json(UserDto::from(&user)))
}

/// GET /users/filter?name=
pub async fn filter_users(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<UserDto>, ApiError> {
    debug!(name = %query.name, "Filtering users by login name");

    let user = state.user_service.get_by_name(&query.name).await?;

    Ok(Json(UserDto::from(&user)))
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Json(request): Json<UserDto>,
) -> Result<impl IntoResponse, ApiError> {
    debug!(login_name = %request.login_name, "Creating user");

    if request.id.is_some() {
        return Err(ApiError::validation(
            "User ID must not be set when creating a user.",
        ));
    }

    let user = state
        .user_service
        .upsert(None, request.into_new_user())
        .await?;

    let location = format!("{}/{}", uri.path().trim_end_matches('/'), user.id());

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(UserDto::from(&user)),
    ))
}

/// PUT /users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UserDto>,
) -> Result<Json<UserDto>, ApiError> {
    debug!(id, "Updating user");

    let id = UserId::new(id);
    if request.user_id() != Some(id) {
        return Err(ApiError::validation(
            "User ID in path and body do not match.",
        ));
    }

    let user = state
        .user_service
        .upsert(Some(id), request.into_new_user())
        .await?;

    Ok(Json(UserDto::from(&user)))
}

/// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    debug!(id, "Deleting user");

    state.user_service.delete_user(UserId::new(id)).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, Response};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::api::router::create_router_with_state;
    use crate::api::types::ApiErrorCode;
    use crate::domain::user::MockUserRepository;
    use crate::infrastructure::user::{InMemoryUserRepository, UserService};

    fn test_app() -> Router {
        let service = UserService::new(Arc::new(InMemoryUserRepository::new()));
        create_router_with_state(AppState::new(Arc::new(service)))
    }

    fn user_body(login_name: &str) -> Value {
        json!({
            "loginName": login_name,
            "emailAddress": format!("{}@uni-heidelberg.de", login_name),
            "firstName": "Jane",
            "lastName": "Doe"
        })
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response<Body> {
        let builder = Request::builder().method(method).uri(uri);

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        app.clone().oneshot(request).await.unwrap()
    }

    async fn body_json(response: Response<Body>) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create(app: &Router, login_name: &str) -> Value {
        let response = send(app, "POST", "/api/users", Some(user_body(login_name))).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await
    }

    #[tokio::test]
    async fn test_create_user() {
        let app = test_app();
        let input = user_body("jane_doe");

        let response = send(&app, "POST", "/api/users", Some(input.clone())).await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();

        let created = body_json(response).await;
        let id = created["id"].as_i64().unwrap();

        assert_eq!(location, format!("/api/users/{}", id));
        assert!(created["createdAt"].is_string());
        assert!(created["updatedAt"].is_string());
        for field in ["loginName", "emailAddress", "firstName", "lastName"] {
            assert_eq!(created[field], input[field]);
        }
    }

    #[tokio::test]
    async fn test_create_with_id_rejected() {
        let app = test_app();
        let mut body = user_body("jane_doe");
        body["id"] = json!(5);

        let response = send(&app, "POST", "/api/users", Some(body)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let users = body_json(send(&app, "GET", "/api/users", None).await).await;
        assert_eq!(users, json!([]));
    }

    #[tokio::test]
    async fn test_create_duplicate_login_name() {
        let app = test_app();
        create(&app, "jane_doe").await;

        let response = send(&app, "POST", "/api/users", Some(user_body("jane_doe"))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error = body_json(response).await;
        assert_eq!(error["code"], "duplication");
    }

    #[tokio::test]
    async fn test_create_invalid_body() {
        let app = test_app();
        let mut body = user_body("jane_doe");
        body["emailAddress"] = json!("not-an-email");

        let response = send(&app, "POST", "/api/users", Some(body)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error = body_json(response).await;
        assert_eq!(error["code"], "validation");
    }

    #[tokio::test]
    async fn test_create_malformed_json() {
        let app = test_app();

        let request = Request::builder()
            .method("POST")
            .uri("/api/users")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"loginName\":"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error = body_json(response).await;
        assert_eq!(error["code"], "invalid_request");
    }

    #[tokio::test]
    async fn test_update_user() {
        let app = test_app();
        let created = create(&app, "jane_doe").await;
        let id = created["id"].as_i64().unwrap();

        let mut changes = created.clone();
        changes["firstName"] = json!("Janeupdated");

        let response = send(&app, "PUT", &format!("/api/users/{}", id), Some(changes)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let updated = body_json(response).await;
        assert_eq!(updated["id"], created["id"]);
        assert_eq!(updated["firstName"], "Janeupdated");
        assert_eq!(updated["loginName"], created["loginName"]);
        assert_eq!(updated["createdAt"], created["createdAt"]);
        assert_ne!(updated["updatedAt"], created["updatedAt"]);
    }

    #[tokio::test]
    async fn test_update_id_mismatch_never_reaches_store() {
        let repository = Arc::new(MockUserRepository::new());
        let service = UserService::new(repository.clone());
        let app = create_router_with_state(AppState::new(Arc::new(service)));

        let mut body = user_body("jane_doe");
        body["id"] = json!(2);

        let response = send(&app, "PUT", "/api/users/1", Some(body)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error = body_json(response).await;
        assert_eq!(error["code"], "validation");
        assert_eq!(error["message"], "User ID in path and body do not match.");
        assert_eq!(repository.calls(), 0);
    }

    #[tokio::test]
    async fn test_update_without_body_id_is_mismatch() {
        let app = test_app();
        let created = create(&app, "jane_doe").await;
        let id = created["id"].as_i64().unwrap();

        let response = send(
            &app,
            "PUT",
            &format!("/api/users/{}", id),
            Some(user_body("jane_doe")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let app = test_app();
        let mut body = user_body("ghost");
        body["id"] = json!(77);

        let response = send(&app, "PUT", "/api/users/77", Some(body)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_rename_collision() {
        let app = test_app();
        create(&app, "taken").await;
        let mine = create(&app, "mine").await;

        let mut changes = mine.clone();
        changes["loginName"] = json!("taken");

        let response = send(
            &app,
            "PUT",
            &format!("/api/users/{}", mine["id"]),
            Some(changes),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "duplication");
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let app = test_app();
        let created = create(&app, "jane_doe").await;
        let uri = format!("/api/users/{}", created["id"]);

        let first = send(&app, "DELETE", &uri, None).await;
        let second = send(&app, "DELETE", &uri, None).await;

        assert_eq!(first.status(), StatusCode::NO_CONTENT);
        assert_eq!(second.status(), StatusCode::NOT_FOUND);

        let remaining = body_json(send(&app, "GET", "/api/users", None).await).await;
        let ids: Vec<&Value> = remaining
            .as_array()
            .unwrap()
            .iter()
            .map(|u| &u["id"])
            .collect();
        assert!(!ids.contains(&&created["id"]));
    }

    #[tokio::test]
    async fn test_get_missing_user() {
        let app = test_app();

        let response = send(&app, "GET", "/api/users/12345", None).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let error: crate::api::types::ApiErrorResponse =
            serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(error.code, ApiErrorCode::NotFound);
        assert_eq!(error.status_code, 404);
        assert_eq!(error.message, "User with id 12345 does not exist.");
    }

    #[tokio::test]
    async fn test_get_user_by_id() {
        let app = test_app();
        let created = create(&app, "jane_doe").await;

        let response = send(&app, "GET", &format!("/api/users/{}", created["id"]), None).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, created);
    }

    #[tokio::test]
    async fn test_non_numeric_id() {
        let app = test_app();

        let response = send(&app, "GET", "/api/users/abc", None).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "invalid_request");
    }

    #[tokio::test]
    async fn test_filter_by_name() {
        let app = test_app();
        create(&app, "other").await;
        let created = create(&app, "jane_doe").await;

        let found = send(&app, "GET", "/api/users/filter?name=jane_doe", None).await;
        assert_eq!(found.status(), StatusCode::OK);
        assert_eq!(body_json(found).await, created);

        let missing = send(&app, "GET", "/api/users/filter?name=nobody", None).await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let no_param = send(&app, "GET", "/api/users/filter", None).await;
        assert_eq!(no_param.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_users() {
        let app = test_app();

        let empty = send(&app, "GET", "/api/users", None).await;
        assert_eq!(empty.status(), StatusCode::OK);
        assert_eq!(body_json(empty).await, json!([]));

        create(&app, "user1").await;
        create(&app, "user2").await;

        let all = body_json(send(&app, "GET", "/api/users", None).await).await;
        let names: Vec<&str> = all
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u["loginName"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["user1", "user2"]);
    }

    #[tokio::test]
    async fn test_storage_failure_is_internal_error() {
        let service = UserService::new(Arc::new(MockUserRepository::new()));
        let app = create_router_with_state(AppState::new(Arc::new(service)));

        let response = send(&app, "GET", "/api/users", None).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["code"], "internal_error");
    }
}
