use aide::transform::TransformOperation;
use axum::extract::State;

use crate::{
	error::FieldErrors,
	extract::{Created, Form, Pk},
	openapi::tag,
	route::model::message,
	store::Store,
	Error,
};

use super::model;

pub fn create_comment_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Create comment")
		.description("Adds a comment to an existing post.")
		.tag(tag::COMMENT)
}

/// Adds a comment to an existing post.
#[tracing::instrument(skip_all)]
pub async fn create_comment(
	State(store): State<Store>,
	Form(input, mut errors): Form<model::CreateCommentInput>,
) -> Result<Created<model::Comment>, Error> {
	if let Some(post) = &input.post {
		if !store.post_exists(post.id).await? {
			errors.add("post", message::does_not_exist(&post.submitted));
		}
	}

	let (Some(content), Some(post), true) = (input.content, input.post, errors.is_empty()) else {
		return Err(errors.into());
	};

	// the post can disappear between the check and the insert
	let comment = store
		.create_comment(post.id, &content)
		.await?
		.ok_or_else(|| does_not_exist(&post))?;

	Ok(Created(comment))
}

fn does_not_exist(post: &Pk) -> FieldErrors {
	let mut errors = FieldErrors::new();

	errors.add("post", message::does_not_exist(&post.submitted));
	errors
}
