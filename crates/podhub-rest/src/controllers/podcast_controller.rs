//! Podcast controller.

use crate::{
    extractors::{ValidatedJson, ValidatedQuery},
    responses::{created, ok, ok_with_message, ApiResult, CreatedResult},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use podhub_core::PodcastId;
use podhub_service::{
    EpisodeListResponse, ListPodcastsQuery, MessageResponse, PodcastEpisodesQuery,
    PodcastListResponse, PodcastRequest, PodcastResponse,
};

/// Creates the podcast router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_podcasts).post(create_podcast))
        .route("/slug/:slug", get(get_podcast_by_slug))
        .route(
            "/:id",
            get(get_podcast).put(update_podcast).delete(delete_podcast),
        )
        .route("/:id/episodes", get(list_podcast_episodes))
}

/// List podcasts.
#[utoipa::path(
    get,
    path = "/api/podcasts",
    tag = "podcasts",
    security(("bearer_auth" = [])),
    params(ListPodcastsQuery),
    responses(
        (status = 200, description = "One page of podcasts", body = PodcastListResponse),
        (status = 404, description = "No podcasts found, or unknown category"),
        (status = 422, description = "Invalid filter")
    )
)]
pub async fn list_podcasts(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ListPodcastsQuery>,
) -> ApiResult<PodcastListResponse> {
    ok(state.podcast_service.list_podcasts(query).await?)
}

/// Get a podcast with its category and episodes.
#[utoipa::path(
    get,
    path = "/api/podcasts/{id}",
    tag = "podcasts",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Podcast id")),
    responses(
        (status = 200, description = "Podcast", body = PodcastResponse),
        (status = 404, description = "Podcast not found")
    )
)]
pub async fn get_podcast(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<PodcastResponse> {
    ok(state.podcast_service.get_podcast(PodcastId(id)).await?)
}

/// Get a podcast by slug.
#[utoipa::path(
    get,
    path = "/api/podcasts/slug/{slug}",
    tag = "podcasts",
    security(("bearer_auth" = [])),
    params(("slug" = String, Path, description = "Podcast slug")),
    responses(
        (status = 200, description = "Podcast", body = PodcastResponse),
        (status = 404, description = "Podcast not found")
    )
)]
pub async fn get_podcast_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<PodcastResponse> {
    ok(state.podcast_service.get_podcast_by_slug(&slug).await?)
}

/// List one podcast's episodes.
#[utoipa::path(
    get,
    path = "/api/podcasts/{id}/episodes",
    tag = "podcasts",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Podcast id"), PodcastEpisodesQuery),
    responses(
        (status = 200, description = "One page of episodes", body = EpisodeListResponse),
        (status = 404, description = "Podcast not found")
    )
)]
pub async fn list_podcast_episodes(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedQuery(query): ValidatedQuery<PodcastEpisodesQuery>,
) -> ApiResult<EpisodeListResponse> {
    ok(state
        .podcast_service
        .list_podcast_episodes(PodcastId(id), query)
        .await?)
}

/// Create a podcast.
#[utoipa::path(
    post,
    path = "/api/podcasts",
    tag = "podcasts",
    security(("bearer_auth" = [])),
    request_body = PodcastRequest,
    responses(
        (status = 201, description = "Podcast created", body = PodcastResponse),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn create_podcast(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<PodcastRequest>,
) -> CreatedResult<PodcastResponse> {
    let podcast = state.podcast_service.create_podcast(request).await?;
    created(podcast, "Podcast created successfully")
}

/// Update a podcast.
#[utoipa::path(
    put,
    path = "/api/podcasts/{id}",
    tag = "podcasts",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Podcast id")),
    request_body = PodcastRequest,
    responses(
        (status = 200, description = "Podcast updated", body = PodcastResponse),
        (status = 404, description = "Podcast not found"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn update_podcast(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<PodcastRequest>,
) -> ApiResult<PodcastResponse> {
    let podcast = state
        .podcast_service
        .update_podcast(PodcastId(id), request)
        .await?;
    ok_with_message(podcast, "Podcast updated successfully")
}

/// Delete a podcast and its episodes.
#[utoipa::path(
    delete,
    path = "/api/podcasts/{id}",
    tag = "podcasts",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Podcast id")),
    responses(
        (status = 200, description = "Podcast deleted", body = MessageResponse),
        (status = 404, description = "Podcast not found")
    )
)]
pub async fn delete_podcast(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<MessageResponse> {
    ok(state.podcast_service.delete_podcast(PodcastId(id)).await?)
}
