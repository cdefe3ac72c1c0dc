use aide::axum::ApiRouter;

use crate::AppState;

pub mod blog;
pub mod comment;
pub mod docs;
pub mod model;

pub fn routes() -> ApiRouter<AppState> {
	ApiRouter::new()
		.merge(blog::routes())
		.merge(comment::routes())
		.merge(docs::routes())
}
