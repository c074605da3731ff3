use axum::{
    Router, middleware,
    http::{HeaderValue, Method, header},
    routing::{delete, get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use quotelist_core::health::{healthz, readyz};
use quotelist_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    auth::{resend_otp, signin, signout, signup, verify_otp},
    quote_list::{
        add_quote_list, add_quote_to_list, delete_quote_from_list, delete_quote_list,
        edit_quote_list, generate_quotes, get_all_quote_lists, search_quote_lists,
        update_quote_list_pinned,
    },
};
use crate::ratelimit::{general_rate_limit, signin_rate_limit, signup_rate_limit};
use crate::state::AppState;

pub fn build_router(state: AppState, frontend_origin: &str) -> Router {
    // Signup and signin carry their own, stricter budgets.
    let signup_routes = Router::new()
        .route("/api/auth/signup", post(signup))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            signup_rate_limit,
        ));
    let signin_routes = Router::new()
        .route("/api/auth/signin", post(signin))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            signin_rate_limit,
        ));

    let auth_routes = Router::new()
        .route("/api/auth/verify-otp", post(verify_otp))
        .route("/api/auth/resend-otp", post(resend_otp))
        .route("/api/auth/signout", get(signout));

    let quote_routes = Router::new()
        .route("/api/quotes/add", post(add_quote_list))
        .route("/api/quotes/generate", post(generate_quotes))
        .route("/api/quotes/edit/{list_id}", put(edit_quote_list))
        .route("/api/quotes/all", get(get_all_quote_lists))
        .route(
            "/api/quotes/update-quote-pinned/{list_id}",
            put(update_quote_list_pinned),
        )
        .route("/api/quotes/delete/{id}", delete(delete_quote_list))
        .route("/api/quotes/{list_id}/add-quote", post(add_quote_to_list))
        .route(
            "/api/quotes/{list_id}/delete-quote/{quote_id}",
            delete(delete_quote_from_list),
        )
        .route("/api/quotes/search", get(search_quote_lists))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            general_rate_limit,
        ));

    let cors = CorsLayer::new()
        .allow_origin(
            frontend_origin
                .parse::<HeaderValue>()
                .expect("invalid FRONTEND_ORIGIN"),
        )
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .merge(signup_routes)
        .merge(signin_routes)
        .merge(auth_routes)
        .merge(quote_routes)
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id_layer())
        .layer(request_id_layer())
        .layer(cors)
        .with_state(state)
}
