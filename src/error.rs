use std::{
	borrow::Cow,
	collections::{btree_map::Entry, BTreeMap},
	fmt,
};

use aide::OperationOutput;
use axum::{
	body::Body,
	extract::{
		multipart::{MultipartError, MultipartRejection},
		rejection,
	},
	http::{Response, StatusCode},
	response::IntoResponse,
	Json,
};
use schemars::JsonSchema;
use serde::Serialize;

/// Error type for the application.
///
/// The Display trait is not sent to the client, so it can show
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("validation error: {0}")]
	Validation(FieldErrors),
	#[error("json error: {0}")]
	Json(#[from] serde_json::Error),
	#[error("expected a json object, got {0}")]
	NotAnObject(&'static str),
	#[error("unsupported media type {0:?}")]
	UnsupportedMediaType(String),
	#[error("body error: {0}")]
	Body(#[from] rejection::BytesRejection),
	#[error("form error: {0}")]
	Form(#[from] rejection::FormRejection),
	#[error("multipart error: {0}")]
	Multipart(#[from] MultipartError),
	#[error("multipart error: {0}")]
	MultipartRejection(#[from] MultipartRejection),
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
}

impl From<FieldErrors> for Error {
	fn from(errors: FieldErrors) -> Self {
		Self::Validation(errors)
	}
}

impl From<validator::ValidationErrors> for Error {
	fn from(errors: validator::ValidationErrors) -> Self {
		Self::Validation(errors.into())
	}
}

/// Per-field validation messages, keyed by the wire name of the field.
///
/// Serialized as `{"field": ["message", ...]}`.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Cow<'static, str>, Vec<Cow<'static, str>>>);

impl FieldErrors {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add(&mut self, field: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) {
		self.0.entry(field.into()).or_default().push(message.into());
	}

	#[cfg(test)]
	pub fn contains(&self, field: &str) -> bool {
		self.0.contains_key(field)
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Adds the errors from a [`validator`] run, skipping fields that
	/// already failed an earlier stage (such as type coercion).
	pub fn merge(&mut self, errors: validator::ValidationErrors) {
		for (field, errors) in errors.field_errors() {
			let Entry::Vacant(entry) = self.0.entry(Cow::Owned(field.to_string())) else {
				continue;
			};

			entry.insert(
				errors
					.iter()
					.map(|error| {
						error
							.message
							.clone()
							.unwrap_or_else(|| error.code.clone())
					})
					.collect(),
			);
		}
	}

	/// Merges the result of [`validator::Validate::validate`].
	pub fn merge_result(&mut self, result: Result<(), validator::ValidationErrors>) {
		if let Err(errors) = result {
			self.merge(errors);
		}
	}
}

impl From<validator::ValidationErrors> for FieldErrors {
	fn from(errors: validator::ValidationErrors) -> Self {
		let mut this = Self::new();

		this.merge(errors);
		this
	}
}

impl fmt::Display for FieldErrors {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut first = true;

		for (field, messages) in &self.0 {
			for message in messages {
				if !first {
					f.write_str(", ")?;
				}

				write!(f, "{field}: {message}")?;
				first = false;
			}
		}

		Ok(())
	}
}

/// A message not tied to a single field.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Detail {
	pub detail: Cow<'static, str>,
}

#[derive(Debug, Serialize)]
pub struct NonFieldErrors {
	pub non_field_errors: Vec<Cow<'static, str>>,
}

fn detail(status: StatusCode, detail: impl Into<Cow<'static, str>>) -> Response<Body> {
	(
		status,
		Json(Detail {
			detail: detail.into(),
		}),
	)
		.into_response()
}

impl IntoResponse for Error {
	fn into_response(self) -> Response<Body> {
		match self {
			Error::Validation(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
			Error::Json(error) => detail(
				StatusCode::BAD_REQUEST,
				format!("JSON parse error - {error}"),
			),
			Error::NotAnObject(kind) => (
				StatusCode::BAD_REQUEST,
				Json(NonFieldErrors {
					non_field_errors: vec![format!(
						"Invalid data. Expected a dictionary, but got {kind}."
					)
					.into()],
				}),
			)
				.into_response(),
			Error::UnsupportedMediaType(media_type) => detail(
				StatusCode::UNSUPPORTED_MEDIA_TYPE,
				format!("Unsupported media type \"{media_type}\" in request."),
			),
			Error::Body(rejection) => detail(rejection.status(), rejection.body_text()),
			Error::Form(rejection) => detail(rejection.status(), rejection.body_text()),
			Error::Multipart(error) => detail(error.status(), error.body_text()),
			Error::MultipartRejection(rejection) => {
				detail(rejection.status(), rejection.body_text())
			}
			Error::Database(error) => {
				tracing::error!(%error, "database error");

				detail(
					StatusCode::INTERNAL_SERVER_ERROR,
					"A server error occurred.",
				)
			}
		}
	}
}

impl OperationOutput for Error {
	type Inner = Self;
}
