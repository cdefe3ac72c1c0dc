use std::collections::HashMap;

use axum::{body::Bytes, extract::Multipart};
use schemars::{
	gen::SchemaGenerator,
	schema::{InstanceType, Schema, SchemaObject},
	JsonSchema,
};

use crate::{
	error::{Error, FieldErrors},
	route::model::message,
};

/// A file part of a multipart request, fully buffered.
#[derive(Debug, Clone)]
pub struct Upload {
	pub file_name: String,
	pub content_type: Option<String>,
	pub data: Bytes,
}

impl JsonSchema for Upload {
	fn schema_name() -> String {
		"Upload".into()
	}

	fn json_schema(_gen: &mut SchemaGenerator) -> Schema {
		SchemaObject {
			instance_type: Some(InstanceType::String.into()),
			format: Some("binary".into()),
			..Default::default()
		}
		.into()
	}
}

/// A single submitted value, before it is coerced to a field type.
#[derive(Debug)]
pub enum Value {
	Text(String),
	File(Upload),
	/// Any JSON value other than a string.
	Json(serde_json::Value),
}

impl Value {
	/// Name of the submitted type, as reported in type errors.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Text(..) => "str",
			Self::File(..) => "file",
			Self::Json(serde_json::Value::Null) => "NoneType",
			Self::Json(serde_json::Value::Bool(..)) => "bool",
			Self::Json(serde_json::Value::Number(number)) if number.is_i64() || number.is_u64() => {
				"int"
			}
			Self::Json(serde_json::Value::Number(..)) => "float",
			Self::Json(serde_json::Value::String(..)) => "str",
			Self::Json(serde_json::Value::Array(..)) => "list",
			Self::Json(serde_json::Value::Object(..)) => "dict",
		}
	}
}

impl From<serde_json::Value> for Value {
	fn from(value: serde_json::Value) -> Self {
		match value {
			serde_json::Value::String(text) => Self::Text(text),
			value => Self::Json(value),
		}
	}
}

/// The submitted fields of a request body, keyed by field name.
///
/// When a field is submitted more than once, the last value wins.
#[derive(Debug, Default)]
pub struct Payload(HashMap<String, Value>);

impl Payload {
	pub fn from_json(value: serde_json::Value) -> Result<Self, Error> {
		match value {
			serde_json::Value::Object(object) => Ok(Self(
				object
					.into_iter()
					.map(|(name, value)| (name, value.into()))
					.collect(),
			)),
			value => Err(Error::NotAnObject(Value::from(value).kind())),
		}
	}

	pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
		Self(
			pairs
				.into_iter()
				.map(|(name, value)| (name, Value::Text(value)))
				.collect(),
		)
	}

	/// Reads every part of a multipart body into memory.
	///
	/// Parts with a filename become [`Value::File`], all others [`Value::Text`].
	/// File parts with an empty filename are what browsers send for a file
	/// input left blank, and are skipped.
	pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, Error> {
		let mut payload = Self::default();

		while let Some(field) = multipart.next_field().await? {
			let Some(name) = field.name().map(str::to_owned) else {
				continue;
			};

			let value = match field.file_name().map(str::to_owned) {
				Some(file_name) if file_name.is_empty() => continue,
				Some(file_name) => {
					let content_type = field.content_type().map(str::to_owned);

					Value::File(Upload {
						file_name,
						content_type,
						data: field.bytes().await?,
					})
				}
				None => Value::Text(field.text().await?),
			};

			payload.insert(name, value);
		}

		Ok(payload)
	}

	pub fn insert(&mut self, name: impl Into<String>, value: Value) {
		self.0.insert(name.into(), value);
	}

	pub fn take(&mut self, name: &str) -> Option<Value> {
		self.0.remove(name)
	}

	/// Moves `alias` to `name` unless `name` was submitted itself.
	pub fn alias(&mut self, alias: &str, name: &str) {
		if self.0.contains_key(name) {
			return;
		}

		if let Some(value) = self.0.remove(alias) {
			self.0.insert(name.to_owned(), value);
		}
	}

	/// Takes a text field with surrounding whitespace removed.
	///
	/// Blank and `null` values are treated as absent. JSON numbers are
	/// accepted and rendered as text.
	pub fn text(&mut self, name: &'static str, errors: &mut FieldErrors) -> Option<String> {
		match self.take(name)? {
			Value::Text(text) => {
				let text = text.trim();

				(!text.is_empty()).then(|| text.to_owned())
			}
			Value::Json(serde_json::Value::Number(number)) => Some(number.to_string()),
			Value::Json(serde_json::Value::Null) => None,
			Value::Json(..) | Value::File(..) => {
				errors.add(name, message::NOT_A_STRING);
				None
			}
		}
	}

	/// Takes a file upload.
	///
	/// An empty form value or `null` is treated as absent; anything else that
	/// is not a file part is rejected.
	pub fn file(&mut self, name: &'static str, errors: &mut FieldErrors) -> Option<Upload> {
		match self.take(name)? {
			Value::File(upload) if upload.data.is_empty() => {
				errors.add(name, message::EMPTY_FILE);
				None
			}
			Value::File(upload) => Some(upload),
			Value::Text(text) if text.is_empty() => None,
			Value::Json(serde_json::Value::Null) => None,
			Value::Text(..) | Value::Json(..) => {
				errors.add(name, message::NOT_A_FILE);
				None
			}
		}
	}

	/// Takes the primary key of a related record.
	///
	/// Integers and integer strings are accepted. Whether the record exists is
	/// checked by the handler.
	pub fn pk(&mut self, name: &'static str, errors: &mut FieldErrors) -> Option<Pk> {
		let value = self.take(name)?;
		let pk = match &value {
			Value::Text(text) if text.trim().is_empty() => return None,
			Value::Json(serde_json::Value::Null) => return None,
			Value::Text(text) => text.trim().parse().ok().map(|id| Pk {
				id,
				submitted: text.clone(),
			}),
			Value::Json(serde_json::Value::Number(number)) => number.as_i64().map(|id| Pk {
				id,
				submitted: number.to_string(),
			}),
			Value::File(..) | Value::Json(..) => None,
		};

		if pk.is_none() {
			errors.add(name, message::incorrect_pk_type(value.kind()));
		}

		pk
	}
}

/// A primary key together with the value the client sent for it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Pk {
	pub id: i64,
	pub submitted: String,
}

/// Builds an input type from the submitted fields.
pub trait FromPayload: Sized {
	/// Reads each field in declaration order, recording coercion errors
	/// in `errors`. Fields that fail coercion are left as `None`.
	fn from_payload(payload: Payload, errors: &mut FieldErrors) -> Self;
}

#[cfg(test)]
mod test {
	use serde_json::json;

	use super::*;

	fn payload(value: serde_json::Value) -> Payload {
		Payload::from_json(value).unwrap()
	}

	#[test]
	fn test_text_trims_and_drops_blank() {
		let mut errors = FieldErrors::new();
		let mut payload = payload(json!({ "a": "  hello ", "b": "   ", "c": null, "d": 12 }));

		assert_eq!(payload.text("a", &mut errors).as_deref(), Some("hello"));
		assert_eq!(payload.text("b", &mut errors), None);
		assert_eq!(payload.text("c", &mut errors), None);
		assert_eq!(payload.text("d", &mut errors).as_deref(), Some("12"));
		assert_eq!(payload.text("missing", &mut errors), None);
		assert!(errors.is_empty());
	}

	#[test]
	fn test_text_rejects_structures() {
		let mut errors = FieldErrors::new();
		let mut payload = payload(json!({ "a": [1, 2], "b": true }));

		assert_eq!(payload.text("a", &mut errors), None);
		assert_eq!(payload.text("b", &mut errors), None);
		assert!(errors.contains("a"));
		assert!(errors.contains("b"));
	}

	#[test]
	fn test_file_requires_upload() {
		let mut errors = FieldErrors::new();
		let mut payload = payload(json!({ "image": "not a file" }));

		assert!(payload.file("image", &mut errors).is_none());
		assert_eq!(
			serde_json::to_value(&errors).unwrap(),
			json!({ "image": [message::NOT_A_FILE] })
		);
	}

	#[test]
	fn test_file_accepts_upload() {
		let mut errors = FieldErrors::new();
		let mut payload = Payload::default();

		payload.insert(
			"image",
			Value::File(Upload {
				file_name: "a.png".into(),
				content_type: Some("image/png".into()),
				data: Bytes::from_static(b"\x89PNG"),
			}),
		);

		let upload = payload.file("image", &mut errors).unwrap();

		assert_eq!(&upload.data[..], b"\x89PNG");
		assert!(errors.is_empty());
	}

	#[test]
	fn test_pk_coercion() {
		let mut errors = FieldErrors::new();
		let mut payload = payload(json!({ "a": 4, "b": " 007 ", "c": "seven", "d": 1.5 }));

		assert_eq!(
			payload.pk("a", &mut errors),
			Some(Pk {
				id: 4,
				submitted: "4".into()
			})
		);
		assert_eq!(
			payload.pk("b", &mut errors),
			Some(Pk {
				id: 7,
				submitted: " 007 ".into()
			})
		);
		assert_eq!(payload.pk("c", &mut errors), None);
		assert_eq!(payload.pk("d", &mut errors), None);
		assert_eq!(
			serde_json::to_value(&errors).unwrap(),
			json!({
				"c": ["Incorrect type. Expected pk value, received str."],
				"d": ["Incorrect type. Expected pk value, received float."],
			})
		);
	}

	#[test]
	fn test_alias_prefers_canonical_name() {
		let mut errors = FieldErrors::new();
		let mut aliased = payload(json!({ "blog": 3 }));
		let mut both = payload(json!({ "blog": 3, "post": 5 }));

		aliased.alias("blog", "post");
		both.alias("blog", "post");

		assert_eq!(aliased.pk("post", &mut errors).map(|pk| pk.id), Some(3));
		assert_eq!(both.pk("post", &mut errors).map(|pk| pk.id), Some(5));
	}

	#[test]
	fn test_non_object_json_is_rejected() {
		assert!(matches!(
			Payload::from_json(json!([1, 2])),
			Err(Error::NotAnObject("list"))
		));
	}
}
