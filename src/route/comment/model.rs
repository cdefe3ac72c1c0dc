use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::Serialize;
use validator::Validate;

use crate::{
	error::FieldErrors,
	extract::{FromPayload, Payload, Pk},
	serialize,
};

/// A comment on a post.
#[derive(Debug, Clone, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Comment {
	pub id: i64,
	/// The creation time of the comment.
	#[serde(serialize_with = "serialize::timestamp")]
	pub created_at: DateTime<Utc>,
	#[serde(skip)]
	pub updated_at: DateTime<Utc>,
	pub content: String,
	/// The id of the post this comment belongs to.
	#[serde(rename = "post")]
	pub post_id: i64,
}

/// The fields accepted when creating a comment.
///
/// The post may also be given as `blog`.
#[derive(Debug, Validate, JsonSchema)]
pub struct CreateCommentInput {
	#[validate(required(message = "This field is required."))]
	pub content: Option<String>,
	/// The id of the post to comment on.
	#[validate(required(message = "This field is required."))]
	#[schemars(with = "Option<i64>")]
	pub post: Option<Pk>,
}

impl FromPayload for CreateCommentInput {
	fn from_payload(mut payload: Payload, errors: &mut FieldErrors) -> Self {
		payload.alias("blog", "post");

		Self {
			content: payload.text("content", errors),
			post: payload.pk("post", errors),
		}
	}
}
