use std::{env, str::FromStr};

use tracing::Level;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://blog.db";
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// An error raised while reading the configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{name} must be valid unicode")]
	NotUnicode { name: &'static str },
	#[error("{name} has an invalid value {value:?}")]
	Invalid { name: &'static str, value: String },
}

/// Runtime configuration, read from environment variables.
///
/// A `.env` file in the working directory is loaded first if present.
#[derive(Debug, Clone)]
pub struct Config {
	pub database_url: String,
	pub database_max_connections: u32,
	pub host: String,
	pub port: u16,
	/// Requests with a larger body are rejected with `413 Payload Too Large`.
	pub max_body_bytes: usize,
	pub log_level: Level,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			database_url: DEFAULT_DATABASE_URL.into(),
			database_max_connections: 5,
			host: "127.0.0.1".into(),
			port: 3000,
			max_body_bytes: DEFAULT_MAX_BODY_BYTES,
			log_level: Level::INFO,
		}
	}
}

impl Config {
	pub fn from_env() -> Result<Self, Error> {
		dotenvy::dotenv().ok();

		Self::from_lookup(|name| env::var(name))
	}

	fn from_lookup<F>(lookup: F) -> Result<Self, Error>
	where
		F: Fn(&'static str) -> Result<String, env::VarError>,
	{
		let defaults = Self::default();
		let var = |name: &'static str| match lookup(name) {
			Ok(value) => Ok(Some(value)),
			Err(env::VarError::NotPresent) => Ok(None),
			Err(env::VarError::NotUnicode(..)) => Err(Error::NotUnicode { name }),
		};

		Ok(Self {
			database_url: var("DATABASE_URL")?.unwrap_or(defaults.database_url),
			database_max_connections: parse(
				"DATABASE_MAX_CONNECTIONS",
				var("DATABASE_MAX_CONNECTIONS")?,
			)?
			.unwrap_or(defaults.database_max_connections),
			host: var("HOST")?.unwrap_or(defaults.host),
			port: parse("PORT", var("PORT")?)?.unwrap_or(defaults.port),
			max_body_bytes: parse("MAX_BODY_BYTES", var("MAX_BODY_BYTES")?)?
				.unwrap_or(defaults.max_body_bytes),
			log_level: parse("LOG_LEVEL", var("LOG_LEVEL")?)?.unwrap_or(defaults.log_level),
		})
	}
}

fn parse<T: FromStr>(name: &'static str, value: Option<String>) -> Result<Option<T>, Error> {
	value
		.map(|value| {
			value
				.trim()
				.parse()
				.map_err(|_| Error::Invalid { name, value })
		})
		.transpose()
}
