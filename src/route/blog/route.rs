use aide::transform::TransformOperation;
use axum::extract::State;

use crate::{
	extract::{Created, Form, Json},
	openapi::tag,
	store::Store,
	Error,
};

use super::model;

pub fn list_posts_docs(op: TransformOperation) -> TransformOperation {
	op.summary("List posts")
		.description("Returns every post, oldest first.")
		.tag(tag::BLOG)
}

/// Returns every post, oldest first.
pub async fn list_posts(State(store): State<Store>) -> Result<Json<Vec<model::Post>>, Error> {
	Ok(Json(store.list_posts().await?))
}

pub fn create_post_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Create post")
		.description(
			"Creates a new post from a JSON, url-encoded or multipart body. \
			 An image can only be attached as a multipart file part.",
		)
		.tag(tag::BLOG)
}

/// Creates a new post.
#[tracing::instrument(skip_all)]
pub async fn create_post(
	State(store): State<Store>,
	Form(input, errors): Form<model::CreatePostInput>,
) -> Result<Created<model::Post>, Error> {
	let Some(title) = input.title.filter(|_| errors.is_empty()) else {
		return Err(errors.into());
	};

	if let Some(image) = &input.image {
		tracing::debug!(
			file_name = %image.file_name,
			content_type = ?image.content_type,
			size = image.data.len(),
			"received image"
		);
	}

	let post = store
		.create_post(
			&title,
			input.description.as_deref(),
			input.image.as_ref().map(|image| &image.data[..]),
		)
		.await?;

	Ok(Created(post))
}
