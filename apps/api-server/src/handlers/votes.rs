//! Vote endpoints: list, summarize and cast.

use actix_web::{HttpResponse, web};

use tally_core::{VoteError, VoteOutcome};
use tally_core::domain::{PostId, Vote, VoteTally, VoteValue};
use tally_shared::ApiResponse;
use tally_shared::dto::{
    CastVoteRequest, CastVoteResponse, VoteAction, VoteResponse, VoteSummaryResponse,
};

use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::observability::RequestId;
use crate::state::AppState;

/// List every vote on a post.
///
/// GET /api/posts/{post_id}/votes
pub async fn list_votes(
    state: web::Data<AppState>,
    path: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    let votes = state.projector.list(path.into_inner()).await?;
    let votes: Vec<VoteResponse> = votes.iter().map(vote_response).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(votes)))
}

/// Like/dislike counts, plus the caller's own vote when a token is sent.
///
/// GET /api/posts/{post_id}/votes/summary
pub async fn vote_summary(
    state: web::Data<AppState>,
    path: web::Path<PostId>,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let tally = state
        .projector
        .summarize(path.into_inner(), identity.user_id())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(summary_response(&tally))))
}

/// Cast a vote. Repeating the current vote withdraws it.
///
/// POST /api/posts/{post_id}/votes
pub async fn cast_vote(
    state: web::Data<AppState>,
    path: web::Path<PostId>,
    identity: OptionalIdentity,
    request_id: RequestId,
    body: web::Json<CastVoteRequest>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    // An anonymous caller is told to log in before being told the value is wrong.
    let user_id = identity.user_id().ok_or(VoteError::Unauthenticated)?;
    let value = VoteValue::try_from(body.vote)?;
    let outcome = state
        .reconciler
        .apply(value, post_id, Some(user_id))
        .await?;

    tracing::debug!(
        request_id = request_id.as_str(),
        post_id,
        action = outcome.label(),
        "Vote cast"
    );

    let (action, message) = match &outcome {
        VoteOutcome::Inserted(_) => (VoteAction::Inserted, "Vote recorded"),
        VoteOutcome::Updated(_) => (VoteAction::Updated, "Vote changed"),
        VoteOutcome::Removed(_) => (VoteAction::Removed, "Vote removed"),
    };
    let response = ApiResponse::ok_with_message(
        CastVoteResponse {
            action,
            vote: outcome.current().map(vote_response),
        },
        message,
    );

    Ok(match outcome {
        VoteOutcome::Inserted(_) => HttpResponse::Created().json(response),
        _ => HttpResponse::Ok().json(response),
    })
}

fn vote_response(vote: &Vote) -> VoteResponse {
    VoteResponse {
        id: vote.id,
        post_id: vote.post_id,
        user_id: vote.user_id.to_string(),
        vote: vote.value.as_i16(),
        created_at: vote.created_at.to_rfc3339(),
    }
}

fn summary_response(tally: &VoteTally) -> VoteSummaryResponse {
    VoteSummaryResponse {
        post_id: tally.post_id,
        likes: tally.likes as u64,
        dislikes: tally.dislikes as u64,
        user_vote: tally.user_vote.map(VoteValue::as_i16),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test};
    use serde_json::{Value, json};
    use uuid::Uuid;

    use tally_core::ports::TokenService;
    use tally_infra::{
        InMemoryCache, InMemoryPubSub, InMemoryVoteRepository, JwtConfig, JwtTokenService,
    };

    use crate::config::AppConfig;
    use crate::handlers::configure_routes;
    use crate::observability::RequestIdMiddleware;
    use crate::state::AppState;

    fn test_state() -> AppState {
        let config = AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            database: None,
            votes_cache_ttl: None,
            redis_enabled: false,
        };
        let cache = Arc::new(InMemoryCache::new());
        let tokens = JwtTokenService::new(JwtConfig {
            secret: "test-secret".to_string(),
            ..JwtConfig::default()
        });

        AppState::assemble(
            Arc::new(InMemoryVoteRepository::new()),
            cache.clone(),
            Some(cache),
            Arc::new(InMemoryPubSub::default()),
            Arc::new(tokens),
            None,
            &config,
        )
    }

    fn bearer(state: &AppState, user_id: Uuid) -> (&'static str, String) {
        let token = state
            .tokens
            .generate_token(user_id)
            .unwrap();
        ("Authorization", format!("Bearer {token}"))
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .wrap(RequestIdMiddleware)
                    .app_data(actix_web::web::Data::new($state.clone()))
                    .configure(configure_routes),
            )
            .await
        };
    }

    #[actix_rt::test]
    async fn test_cast_requires_login() {
        let state = test_state();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/posts/1/votes")
            .set_json(json!({ "vote": 1 }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["detail"], "You must be logged in to vote");
    }

    #[actix_rt::test]
    async fn test_anonymous_invalid_value_is_unauthenticated() {
        let state = test_state();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/posts/1/votes")
            .set_json(json!({ "vote": 0 }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn test_list_reflects_vote_cast_after_it_was_cached() {
        let state = test_state();
        let app = app!(state);
        let list = || {
            test::TestRequest::get()
                .uri("/api/posts/6/votes/summary")
                .to_request()
        };

        let body: Value = test::call_and_read_body_json(&app, list()).await;
        assert_eq!(body["data"]["likes"], 0);

        let req = test::TestRequest::post()
            .uri("/api/posts/6/votes")
            .insert_header(bearer(&state, Uuid::new_v4()))
            .set_json(json!({ "vote": 1 }))
            .to_request();
        test::call_service(&app, req).await;

        let body: Value = test::call_and_read_body_json(&app, list()).await;
        assert_eq!(body["data"]["likes"], 1);
    }

    #[actix_rt::test]
    async fn test_cast_rejects_invalid_value() {
        let state = test_state();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/posts/1/votes")
            .insert_header(bearer(&state, Uuid::new_v4()))
            .set_json(json!({ "vote": 0 }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_rt::test]
    async fn test_like_flip_and_withdraw() {
        let state = test_state();
        let app = app!(state);
        let auth = bearer(&state, Uuid::new_v4());

        let cast = |vote: i16| {
            test::TestRequest::post()
                .uri("/api/posts/5/votes")
                .insert_header(auth.clone())
                .set_json(json!({ "vote": vote }))
                .to_request()
        };

        let resp = test::call_service(&app, cast(1)).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["action"], "inserted");
        assert_eq!(body["data"]["vote"]["vote"], 1);

        let resp = test::call_service(&app, cast(-1)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["action"], "updated");
        assert_eq!(body["data"]["vote"]["vote"], -1);

        let resp = test::call_service(&app, cast(-1)).await;
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["action"], "removed");
        assert!(body["data"]["vote"].is_null());

        let req = test::TestRequest::get()
            .uri("/api/posts/5/votes")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"], json!([]));
    }

    #[actix_rt::test]
    async fn test_summary_reflects_caller_vote() {
        let state = test_state();
        let app = app!(state);
        let me = bearer(&state, Uuid::new_v4());

        for auth in [bearer(&state, Uuid::new_v4()), me.clone()] {
            let req = test::TestRequest::post()
                .uri("/api/posts/9/votes")
                .insert_header(auth)
                .set_json(json!({ "vote": 1 }))
                .to_request();
            test::call_service(&app, req).await;
        }

        let req = test::TestRequest::get()
            .uri("/api/posts/9/votes/summary")
            .insert_header(me)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["likes"], 2);
        assert_eq!(body["data"]["dislikes"], 0);
        assert_eq!(body["data"]["user_vote"], 1);

        let req = test::TestRequest::get()
            .uri("/api/posts/9/votes/summary")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["likes"], 2);
        assert!(body["data"].get("user_vote").is_none());
    }

    #[actix_rt::test]
    async fn test_list_is_fresh_after_cast() {
        let state = test_state();
        let app = app!(state);

        let list = || {
            test::TestRequest::get()
                .uri("/api/posts/3/votes")
                .to_request()
        };

        let body: Value = test::call_and_read_body_json(&app, list()).await;
        assert_eq!(body["data"], json!([]));

        let req = test::TestRequest::post()
            .uri("/api/posts/3/votes")
            .insert_header(bearer(&state, Uuid::new_v4()))
            .set_json(json!({ "vote": -1 }))
            .to_request();
        test::call_service(&app, req).await;

        let body: Value = test::call_and_read_body_json(&app, list()).await;
        assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
        assert_eq!(body["data"][0]["vote"], -1);
    }

    #[actix_rt::test]
    async fn test_responses_carry_request_id() {
        let state = test_state();
        let app = app!(state);

        let req = test::TestRequest::get()
            .uri("/api/health")
            .insert_header(("X-Request-ID", "abc-123"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("x-request-id").and_then(|v| v.to_str().ok()),
            Some("abc-123")
        );
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["database"], "memory");
    }

    #[actix_rt::test]
    async fn test_malformed_body_is_bad_request() {
        let state = test_state();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/posts/1/votes")
            .insert_header(bearer(&state, Uuid::new_v4()))
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{\"vote\":")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], 400);
    }
}
