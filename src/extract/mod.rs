mod payload;

pub use payload::{FromPayload, Payload, Pk, Upload};

use aide::{
	gen::GenContext,
	openapi::{
		MediaType, Operation, ReferenceOr, RequestBody, Response as ApiResponse, SchemaObject,
	},
	OperationInput, OperationOutput,
};
use axum::{
	body::{Body, Bytes},
	extract::{FromRequest, Multipart, Request},
	http::{header, Response, StatusCode},
	response::IntoResponse,
};
use schemars::JsonSchema;

use crate::error::{Error, FieldErrors};

/// Serializes the inner value as a JSON response body.
///
/// ```rust
/// async fn route() -> Json<Vec<Post>> {
///   // ...
/// }
/// ```
pub struct Json<T>(pub T);

impl<T> IntoResponse for Json<T>
where
	T: serde::Serialize,
{
	fn into_response(self) -> Response<Body> {
		axum::Json(self.0).into_response()
	}
}

impl<T> OperationOutput for Json<T>
where
	T: JsonSchema,
{
	type Inner = T;

	fn operation_response(ctx: &mut GenContext, operation: &mut Operation) -> Option<ApiResponse> {
		axum::Json::<T>::operation_response(ctx, operation)
	}

	fn inferred_responses(
		ctx: &mut GenContext,
		operation: &mut Operation,
	) -> Vec<(Option<u16>, ApiResponse)> {
		axum::Json::<T>::inferred_responses(ctx, operation)
	}
}

/// Like [`Json<T>`], but responds with `201 Created`.
pub struct Created<T>(pub T);

impl<T> IntoResponse for Created<T>
where
	T: serde::Serialize,
{
	fn into_response(self) -> Response<Body> {
		(StatusCode::CREATED, axum::Json(self.0)).into_response()
	}
}

impl<T> OperationOutput for Created<T>
where
	T: JsonSchema,
{
	type Inner = T;

	fn operation_response(ctx: &mut GenContext, operation: &mut Operation) -> Option<ApiResponse> {
		axum::Json::<T>::operation_response(ctx, operation)
	}

	fn inferred_responses(
		ctx: &mut GenContext,
		operation: &mut Operation,
	) -> Vec<(Option<u16>, ApiResponse)> {
		Self::operation_response(ctx, operation)
			.map(|response| vec![(Some(StatusCode::CREATED.as_u16()), response)])
			.unwrap_or_default()
	}
}

/// Extractor that reads a JSON, multipart or url-encoded body into `T`.
///
/// Type errors found while reading the fields and the result of
/// [`validator::Validate`] are collected in the second element rather than
/// rejecting the request, so handlers can add their own checks before
/// reporting everything at once.
///
/// ```rust
/// async fn route(Form(input, errors): Form<CreatePostInput>) -> Result<(), Error> {
///   if !errors.is_empty() {
///     return Err(errors.into());
///   }
///   // ...
/// }
/// ```
pub struct Form<T>(pub T, pub FieldErrors);

#[axum::async_trait]
impl<T, S> FromRequest<S> for Form<T>
where
	T: FromPayload + validator::Validate,
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		let media_type = req
			.headers()
			.get(header::CONTENT_TYPE)
			.and_then(|value| value.to_str().ok())
			.and_then(|value| value.split(';').next())
			.map(|value| value.trim().to_ascii_lowercase());

		let payload = match media_type.as_deref() {
			Some("multipart/form-data") => {
				Payload::from_multipart(Multipart::from_request(req, state).await?).await?
			}
			Some("application/x-www-form-urlencoded") => {
				let axum::Form(pairs) =
					axum::Form::<Vec<(String, String)>>::from_request(req, state).await?;

				Payload::from_pairs(pairs)
			}
			Some("application/json") | None => {
				let body = Bytes::from_request(req, state).await?;

				if body.is_empty() {
					Payload::default()
				} else {
					Payload::from_json(serde_json::from_slice(&body)?)?
				}
			}
			Some(other) => return Err(Error::UnsupportedMediaType(other.to_owned())),
		};

		let mut errors = FieldErrors::new();
		let input = T::from_payload(payload, &mut errors);

		errors.merge_result(input.validate());

		Ok(Self(input, errors))
	}
}

/// Media types accepted by [`Form<T>`], in the order they are documented.
const FORM_MEDIA_TYPES: [&str; 3] = [
	"multipart/form-data",
	"application/json",
	"application/x-www-form-urlencoded",
];

impl<T> OperationInput for Form<T>
where
	T: JsonSchema,
{
	fn operation_input(ctx: &mut GenContext, operation: &mut Operation) {
		let schema = ctx.schema.subschema_for::<T>();
		let content = FORM_MEDIA_TYPES
			.into_iter()
			.map(|media_type| {
				(
					media_type.to_owned(),
					MediaType {
						schema: Some(SchemaObject {
							json_schema: schema.clone(),
							external_docs: None,
							example: None,
						}),
						..Default::default()
					},
				)
			})
			.collect();

		operation.request_body = Some(ReferenceOr::Item(RequestBody {
			description: None,
			content,
			required: true,
			extensions: Default::default(),
		}));
	}
}
