use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::{
	route::{blog::model::Post, comment::model::Comment},
	serialize, Database,
};

/// Data access for posts and comments.
///
/// Cloning is cheap, all clones share one connection pool. Every write runs
/// in its own transaction.
#[derive(Clone)]
pub struct Store {
	database: Database,
}

impl Store {
	pub fn new(database: Database) -> Self {
		Self { database }
	}

	/// Opens (creating if missing) the database at `url` and applies
	/// pending migrations.
	pub async fn connect(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
		let options = SqliteConnectOptions::from_str(url)?
			.create_if_missing(true)
			.foreign_keys(true);

		let database = SqlitePoolOptions::new()
			.max_connections(max_connections)
			.connect_with(options)
			.await?;

		let store = Self::new(database);

		store.migrate().await?;
		Ok(store)
	}

	#[cfg(test)]
	pub fn database(&self) -> &Database {
		&self.database
	}

	pub async fn migrate(&self) -> Result<(), sqlx::Error> {
		sqlx::migrate!().run(&self.database).await?;

		Ok(())
	}

	/// Returns every post, oldest first.
	pub async fn list_posts(&self) -> Result<Vec<Post>, sqlx::Error> {
		sqlx::query_as::<_, Post>(
			r#"
				SELECT * FROM post
				ORDER BY id ASC
			"#,
		)
		.fetch_all(&self.database)
		.await
	}

	pub async fn create_post(
		&self,
		title: &str,
		description: Option<&str>,
		image: Option<&[u8]>,
	) -> Result<Post, sqlx::Error> {
		let now = serialize::now();
		let mut transaction = self.database.begin().await?;

		let post = sqlx::query_as::<_, Post>(
			r#"
				INSERT INTO post (created_at, updated_at, title, description, image)
				VALUES (?1, ?1, ?2, ?3, ?4)
				RETURNING *
			"#,
		)
		.bind(now)
		.bind(title)
		.bind(description)
		.bind(image)
		.fetch_one(&mut *transaction)
		.await?;

		transaction.commit().await?;

		tracing::info!(post.id = post.id, "created post");

		Ok(post)
	}

	pub async fn post_exists(&self, id: i64) -> Result<bool, sqlx::Error> {
		let exists = sqlx::query_scalar::<_, i64>("SELECT EXISTS (SELECT 1 FROM post WHERE id = ?1)")
			.bind(id)
			.fetch_one(&self.database)
			.await?;

		Ok(exists != 0)
	}

	/// Creates a comment on the post `post_id`.
	///
	/// Returns `None` without writing anything if the post does not exist.
	pub async fn create_comment(
		&self,
		post_id: i64,
		content: &str,
	) -> Result<Option<Comment>, sqlx::Error> {
		let now = serialize::now();
		let mut transaction = self.database.begin().await?;

		let exists =
			sqlx::query_scalar::<_, i64>("SELECT EXISTS (SELECT 1 FROM post WHERE id = ?1)")
				.bind(post_id)
				.fetch_one(&mut *transaction)
				.await?;

		if exists == 0 {
			transaction.rollback().await?;

			return Ok(None);
		}

		let comment = sqlx::query_as::<_, Comment>(
			r#"
				INSERT INTO comment (created_at, updated_at, content, post_id)
				VALUES (?1, ?1, ?2, ?3)
				RETURNING *
			"#,
		)
		.bind(now)
		.bind(content)
		.bind(post_id)
		.fetch_one(&mut *transaction)
		.await?;

		transaction.commit().await?;

		tracing::info!(comment.id = comment.id, post.id = post_id, "created comment");

		Ok(Some(comment))
	}
}
