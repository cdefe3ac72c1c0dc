#![warn(clippy::pedantic)]

mod config;
mod error;
mod extract;
mod openapi;
mod route;
mod serialize;
mod store;
mod trace;


use std::sync::Arc;

use aide::openapi::OpenApi;
use axum::{
	body::Body,
	extract::DefaultBodyLimit,
	http::Request,
	Extension, Router,
};
use tower::ServiceBuilder;
use tower_http::{
	cors::CorsLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};

pub use error::Error;

use config::Config;
use store::Store;

pub type Database = sqlx::SqlitePool;
pub type AppState = State;

/// The shared application state.
///
/// Handlers reach the store through `State<Store>`, everything else they
/// need travels with the request.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub store: Store,
}

/// Builds the router with documentation, request ids, tracing and the
/// body size limit applied.
pub fn app(state: State, config: &Config) -> Router {
	let mut api = OpenApi::default();

	route::routes()
		.finish_api_with(&mut api, openapi::docs)
		.layer(Extension(Arc::new(api)))
		.layer(DefaultBodyLimit::max(config.max_body_bytes))
		.layer(
			ServiceBuilder::new()
				.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
				.layer(
					TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
						let request_id = request
							.headers()
							.get("x-request-id")
							.and_then(|value| value.to_str().ok())
							.unwrap_or_default();

						tracing::info_span!(
							"request",
							method = %request.method(),
							uri = %request.uri(),
							request_id
						)
					}),
				)
				.layer(PropagateRequestIdLayer::x_request_id())
				.layer(CorsLayer::permissive()),
		)
		.with_state(state)
}

#[tokio::main]
async fn main() {
	let config = Config::from_env().expect("invalid configuration");

	trace::init_tracing_subscriber(config.log_level);

	let store = Store::connect(&config.database_url, config.database_max_connections)
		.await
		.expect("failed to connect to database");

	let app = app(State { store }, &config);

	let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
		.await
		.expect("failed to bind to port");

	tracing::info!("listening on {}:{}", config.host, config.port);

	axum::serve(listener, app)
		.with_graceful_shutdown(shutdown_signal())
		.await
		.expect("server error");
}

async fn shutdown_signal() {
	if let Err(error) = tokio::signal::ctrl_c().await {
		tracing::error!(%error, "failed to listen for ctrl-c");
		std::future::pending::<()>().await;
	}

	tracing::info!("shutting down");
}
