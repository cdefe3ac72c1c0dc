use aide::axum::{routing::get_with, ApiRouter};

use crate::AppState;

pub mod model;
pub mod route;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new().api_route(
		"/blog/",
		get_with(list_posts, list_posts_docs).post_with(create_post, create_post_docs),
	)
}
