use axum::{
    Json, Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{delete, get, post, put},
};
use tower_http::cors::CorsLayer;

use crate::{
    api::http::{
        auth as auth_http, books as books_http, collections as collections_http,
        comments as comments_http, friends as friends_http, hitokoto as hitokoto_http,
        images as images_http, posts as posts_http, tags as tags_http,
    },
    app::state::AppState,
    auth::middleware::{auth_middleware, optional_auth_middleware},
    telemetry::request_logging_middleware,
};

pub fn build_router(state: AppState) -> Router {
    let allowed_origin = state
        .frontend_url
        .parse::<HeaderValue>()
        .unwrap_or_else(|_| HeaderValue::from_static("http://localhost:3000"));
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    // Comment moderation requires a verified session before the usecase
    // checks the admin/ownership rules.
    let moderation_routes = Router::new()
        .route("/api/comments", get(comments_http::list_all_comments_handle))
        .route(
            "/api/comments/{comment_id}",
            delete(comments_http::delete_comment_handle),
        )
        .route(
            "/api/comments/{comment_id}/approve",
            put(comments_http::approve_comment_handle),
        )
        .route(
            "/api/admin/comments/pending",
            get(comments_http::list_pending_comments_handle),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Everything else shares one group: a valid session is attached when
    // present and each usecase decides what it requires.
    let api_routes = Router::new()
        .route(
            "/api/posts",
            get(posts_http::list_posts_handle).post(posts_http::create_post_handle),
        )
        .route(
            "/api/posts/{post_id}",
            get(posts_http::get_post_handle)
                .put(posts_http::update_post_handle)
                .delete(posts_http::delete_post_handle),
        )
        .route(
            "/api/posts/{post_id}/comments",
            get(comments_http::list_post_comments_handle)
                .post(comments_http::create_comment_handle),
        )
        .route(
            "/api/tags",
            get(tags_http::list_tags_handle).post(tags_http::create_tag_handle),
        )
        .route(
            "/api/tags/{tag_id}",
            get(tags_http::get_tag_handle)
                .put(tags_http::update_tag_handle)
                .delete(tags_http::delete_tag_handle),
        )
        .route(
            "/api/tags/tag-slug/{slug}/posts",
            get(tags_http::posts_by_tag_handle),
        )
        .route("/api/auth/login", post(auth_http::login_handle))
        .route("/api/auth/logout", post(auth_http::logout_handle))
        .route("/api/auth/github", get(auth_http::github_login_handle))
        .route(
            "/api/auth/github/callback",
            get(auth_http::github_callback_handle),
        )
        .route(
            "/api/users/me",
            get(auth_http::get_me_handle).put(auth_http::update_me_handle),
        )
        .route(
            "/api/friends",
            get(friends_http::list_friends_handle).post(friends_http::create_friend_handle),
        )
        .route(
            "/api/friends/{friend_id}",
            put(friends_http::update_friend_handle).delete(friends_http::delete_friend_handle),
        )
        .route(
            "/api/books",
            get(books_http::list_books_handle).post(books_http::create_book_handle),
        )
        .route(
            "/api/books/{book_id}",
            get(books_http::get_book_handle)
                .put(books_http::update_book_handle)
                .delete(books_http::delete_book_handle),
        )
        .route(
            "/api/books/batch-delete",
            post(books_http::batch_delete_books_handle),
        )
        .route(
            "/api/hitokoto",
            get(hitokoto_http::list_hitokoto_handle).post(hitokoto_http::create_hitokoto_handle),
        )
        .route(
            "/api/hitokoto/{hitokoto_id}",
            put(hitokoto_http::update_hitokoto_handle)
                .delete(hitokoto_http::delete_hitokoto_handle),
        )
        .route("/api/images", get(images_http::list_images_handle))
        .route(
            "/api/images/{image_id}",
            get(images_http::get_image_handle).delete(images_http::delete_image_handle),
        )
        .route(
            "/api/images/batch-delete",
            post(images_http::batch_delete_images_handle),
        )
        .route(
            "/api/collections",
            get(collections_http::list_collections_handle)
                .post(collections_http::create_collection_handle),
        )
        .route(
            "/api/collections/{collection_id}",
            put(collections_http::update_collection_handle)
                .delete(collections_http::delete_collection_handle),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            optional_auth_middleware,
        ));

    Router::new()
        .route("/ping", get(ping_handle))
        .merge(moderation_routes)
        .merge(api_routes)
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(middleware::from_fn(
            crate::app::middleware::security_headers,
        ))
        .layer(cors)
        .with_state(state)
}

async fn ping_handle() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "pong" }))
}
