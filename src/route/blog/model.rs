use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::Serialize;
use validator::Validate;

use crate::{
	error::FieldErrors,
	extract::{FromPayload, Payload, Upload},
	serialize,
};

/// A single blog post.
#[derive(Debug, Clone, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Post {
	/// The unique identifier of the post, in creation order.
	pub id: i64,
	/// The creation time of the post.
	#[serde(serialize_with = "serialize::timestamp")]
	pub created_at: DateTime<Utc>,
	#[serde(skip)]
	pub updated_at: DateTime<Utc>,
	/// The title of the post.
	pub title: String,
	pub description: Option<String>,
	/// The attached image rendered as a bytes literal, such as `b'\x89PNG'`.
	#[serde(serialize_with = "serialize::bytes_literal")]
	#[schemars(with = "Option<String>")]
	pub image: Option<Vec<u8>>,
}

/// The fields accepted when creating a post.
#[derive(Debug, Validate, JsonSchema)]
pub struct CreatePostInput {
	/// Required, at most 50 characters.
	#[validate(
		required(message = "This field is required."),
		length(max = 50, message = "Ensure this field has no more than 50 characters.")
	)]
	pub title: Option<String>,
	pub description: Option<String>,
	/// Only accepted as a file part of a multipart body.
	pub image: Option<Upload>,
}

impl FromPayload for CreatePostInput {
	fn from_payload(mut payload: Payload, errors: &mut FieldErrors) -> Self {
		Self {
			title: payload.text("title", errors),
			description: payload.text("description", errors),
			image: payload.file("image", errors),
		}
	}
}

#[cfg(test)]
mod test {
	use serde_json::json;

	use super::*;

	fn validate(payload: serde_json::Value) -> serde_json::Value {
		let mut errors = FieldErrors::new();
		let input = CreatePostInput::from_payload(Payload::from_json(payload).unwrap(), &mut errors);

		errors.merge_result(input.validate());
		serde_json::to_value(errors).unwrap()
	}

	#[test]
	fn test_title_is_required() {
		assert_eq!(
			validate(json!({ "description": "text" })),
			json!({ "title": ["This field is required."] })
		);
		assert_eq!(
			validate(json!({ "title": "   " })),
			json!({ "title": ["This field is required."] })
		);
	}

	#[test]
	fn test_title_max_length() {
		assert_eq!(validate(json!({ "title": "a".repeat(50) })), json!({}));
		assert_eq!(
			validate(json!({ "title": "a".repeat(51) })),
			json!({ "title": ["Ensure this field has no more than 50 characters."] })
		);
		// counted in characters, not bytes
		assert_eq!(validate(json!({ "title": "é".repeat(50) })), json!({}));
	}

	#[test]
	fn test_errors_are_aggregated() {
		assert_eq!(
			validate(json!({ "title": ["a"], "image": "x" })),
			json!({
				"title": ["Not a valid string."],
				"image": ["The submitted data was not a file. Check the encoding type on the form."],
			})
		);
	}

	#[test]
	fn test_post_serialization() {
		let created_at = DateTime::parse_from_rfc3339("2024-01-31T12:30:05.123456Z")
			.unwrap()
			.with_timezone(&Utc);

		let post = Post {
			id: 1,
			created_at,
			updated_at: created_at,
			title: "My Blog Title".into(),
			description: None,
			image: Some(b"GIF89a\x01".to_vec()),
		};

		assert_eq!(
			serde_json::to_value(&post).unwrap(),
			json!({
				"id": 1,
				"created_at": "2024-01-31T12:30:05.123456Z",
				"title": "My Blog Title",
				"description": null,
				"image": "b'GIF89a\\x01'",
			})
		);
	}
}
