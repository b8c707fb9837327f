//! Episode controller.

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
use podhub_core::EpisodeId;
use podhub_service::{
    EpisodeListResponse, EpisodeRequest, EpisodeResponse, ListEpisodesQuery, MessageResponse,
};

/// Creates the episode router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_episodes).post(create_episode))
        .route(
            "/:id",
            get(get_episode).put(update_episode).delete(delete_episode),
        )
}

/// List episodes, newest season first.
#[utoipa::path(
    get,
    path = "/api/episodes",
    tag = "episodes",
    security(("bearer_auth" = [])),
    params(ListEpisodesQuery),
    responses(
        (status = 200, description = "One page of episodes", body = EpisodeListResponse)
    )
)]
pub async fn list_episodes(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ListEpisodesQuery>,
) -> ApiResult<EpisodeListResponse> {
    ok(state.episode_service.list_episodes(query).await?)
}

/// Get an episode with a summary of its podcast.
#[utoipa::path(
    get,
    path = "/api/episodes/{id}",
    tag = "episodes",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Episode id")),
    responses(
        (status = 200, description = "Episode", body = EpisodeResponse),
        (status = 404, description = "Episode not found")
    )
)]
pub async fn get_episode(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<EpisodeResponse> {
    ok(state.episode_service.get_episode(EpisodeId(id)).await?)
}

/// Create an episode.
#[utoipa::path(
    post,
    path = "/api/episodes",
    tag = "episodes",
    security(("bearer_auth" = [])),
    request_body = EpisodeRequest,
    responses(
        (status = 201, description = "Episode created", body = EpisodeResponse),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn create_episode(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<EpisodeRequest>,
) -> CreatedResult<EpisodeResponse> {
    let episode = state.episode_service.create_episode(request).await?;
    created(episode, "Episode created successfully")
}

/// Update an episode.
#[utoipa::path(
    put,
    path = "/api/episodes/{id}",
    tag = "episodes",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Episode id")),
    request_body = EpisodeRequest,
    responses(
        (status = 200, description = "Episode updated", body = EpisodeResponse),
        (status = 404, description = "Episode not found"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn update_episode(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<EpisodeRequest>,
) -> ApiResult<EpisodeResponse> {
    let episode = state
        .episode_service
        .update_episode(EpisodeId(id), request)
        .await?;
    ok_with_message(episode, "Episode updated successfully")
}

/// Delete an episode.
#[utoipa::path(
    delete,
    path = "/api/episodes/{id}",
    tag = "episodes",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Episode id")),
    responses(
        (status = 200, description = "Episode deleted", body = MessageResponse),
        (status = 404, description = "Episode not found")
    )
)]
pub async fn delete_episode(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<MessageResponse> {
    ok(state.episode_service.delete_episode(EpisodeId(id)).await?)
}
