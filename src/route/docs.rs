use std::sync::Arc;

use aide::{
	axum::{
		routing::{get, get_with},
		ApiRouter, IntoApiResponse,
	},
	openapi::OpenApi,
	scalar::Scalar,
};
use axum::{response::IntoResponse, Extension};

use crate::{extract::Json, AppState};

/// Where the generated OpenAPI document is served.
pub const OPENAPI_PATH: &str = "/docs/api.json";

/// The interactive reference at `/docs`, backed by the document at
/// [`OPENAPI_PATH`]. The document itself is left out of the generated API.
pub fn routes() -> ApiRouter<AppState> {
	ApiRouter::new()
		.api_route(
			"/docs",
			get_with(
				Scalar::new(OPENAPI_PATH).with_title("Blog API").axum_handler(),
				|op| {
					op.summary("API reference")
						.description("Interactive reference for the blog and comment endpoints.")
				},
			),
		)
		.route(OPENAPI_PATH, get(openapi_document))
}

async fn openapi_document(Extension(api): Extension<Arc<OpenApi>>) -> impl IntoApiResponse {
	Json(api.as_ref()).into_response()
}
