//! Serde helpers for the response shapes.

use std::fmt::Write;

use chrono::{DateTime, SubsecRound, Utc};
use serde::Serializer;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Current time, truncated to the precision that is rendered to clients.
pub fn now() -> DateTime<Utc> {
	Utc::now().trunc_subsecs(6)
}

/// Renders a timestamp as `2024-01-31T12:00:00.000000Z`.
pub fn timestamp<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
}

/// Renders binary data as a bytes literal, or `null` when absent.
pub fn bytes_literal<S>(value: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	match value {
		Some(bytes) => serializer.serialize_str(&literal(bytes)),
		None => serializer.serialize_none(),
	}
}

/// Formats bytes as a literal such as `b'\x89PNG\r\n'`.
///
/// Single quotes are used unless the data contains a single quote and
/// no double quote. Printable ASCII is kept, everything else is escaped.
pub fn literal(bytes: &[u8]) -> String {
	let quote = if bytes.contains(&b'\'') && !bytes.contains(&b'"') {
		'"'
	} else {
		'\''
	};

	let mut out = String::with_capacity(bytes.len() + 3);

	out.push('b');
	out.push(quote);

	for &byte in bytes {
		match byte {
			b'\\' => out.push_str("\\\\"),
			b'\t' => out.push_str("\\t"),
			b'\n' => out.push_str("\\n"),
			b'\r' => out.push_str("\\r"),
			_ if char::from(byte) == quote => {
				out.push('\\');
				out.push(quote);
			}
			0x20..=0x7e => out.push(char::from(byte)),
			_ => {
				let _ = write!(out, "\\x{byte:02x}");
			}
		}
	}

	out.push(quote);
	out
}
