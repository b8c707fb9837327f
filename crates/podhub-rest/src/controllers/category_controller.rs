//! Category controller.

use crate::{
    extractors::ValidatedJson,
    responses::{created, ok, ok_with_message, ApiResult, CreatedResult},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use podhub_core::CategoryId;
use podhub_service::{CategoryRequest, CategoryResponse, MessageResponse};
use tracing::debug;

/// Creates the category router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/slug/:slug", get(get_category_by_slug))
        .route(
            "/:id",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
}

/// List all categories.
#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "categories",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All categories", body = Vec<CategoryResponse>)
    )
)]
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Vec<CategoryResponse>> {
    ok(state.category_service.list_categories().await?)
}

/// Get a category by id.
#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    tag = "categories",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category", body = CategoryResponse),
        (status = 404, description = "Category not found")
    )
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<CategoryResponse> {
    ok(state.category_service.get_category(CategoryId(id)).await?)
}

/// Get a category by slug.
#[utoipa::path(
    get,
    path = "/api/categories/slug/{slug}",
    tag = "categories",
    security(("bearer_auth" = [])),
    params(("slug" = String, Path, description = "Category slug")),
    responses(
        (status = 200, description = "Category", body = CategoryResponse),
        (status = 404, description = "Category not found")
    )
)]
pub async fn get_category_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<CategoryResponse> {
    ok(state.category_service.get_category_by_slug(&slug).await?)
}

/// Create a category.
#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "categories",
    security(("bearer_auth" = [])),
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn create_category(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CategoryRequest>,
) -> CreatedResult<CategoryResponse> {
    debug!("Create category request: {}", request.name);

    let category = state.category_service.create_category(request).await?;
    created(category, "Category created successfully")
}

/// Update a category.
#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    tag = "categories",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Category id")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 404, description = "Category not found"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<CategoryRequest>,
) -> ApiResult<CategoryResponse> {
    let category = state
        .category_service
        .update_category(CategoryId(id), request)
        .await?;
    ok_with_message(category, "Category updated successfully")
}

/// Delete a category without podcasts.
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    tag = "categories",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category deleted", body = MessageResponse),
        (status = 422, description = "Category still has podcasts")
    )
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<MessageResponse> {
    ok(state.category_service.delete_category(CategoryId(id)).await?)
}
