use aide::axum::{routing::post_with, ApiRouter};

use crate::AppState;

pub mod model;
pub mod route;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new().api_route("/comment/", post_with(create_comment, create_comment_docs))
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[tokio::test]
	async fn test_create_comment() {
		let (server, store) = server().await;
		let post = store.create_post("title", None, None).await.unwrap();

		let response = server
			.post("/comment/")
			.json(&json!({ "content": "Nice post!", "post": post.id }))
			.await;

		assert_eq!(response.status_code(), 201);

		let body = response.json::<Value>();

		assert_eq!(body["content"], "Nice post!");
		assert_eq!(body["post"], post.id);
		assert_eq!(count(store.database(), "comment").await, 1);
	}

	#[tokio::test]
	async fn test_create_comment_with_blog_alias() {
		let (server, store) = server().await;
		let post = store.create_post("title", None, None).await.unwrap();
		let id = post.id.to_string();

		let response = server
			.post("/comment/")
			.form(&[("content", "From a form"), ("blog", id.as_str())])
			.await;

		assert_eq!(response.status_code(), 201);
		assert_eq!(response.json::<Value>()["post"], post.id);
	}

	#[tokio::test]
	async fn test_create_comment_for_unknown_post() {
		let (server, store) = server().await;

		let response = server
			.post("/comment/")
			.json(&json!({ "content": "Hello?", "post": 42 }))
			.await;

		assert_eq!(response.status_code(), 400);
		assert_eq!(
			response.json::<Value>(),
			json!({ "post": ["Invalid pk \"42\" - object does not exist."] })
		);
		assert_eq!(count(store.database(), "comment").await, 0);
	}

	#[tokio::test]
	async fn test_unknown_post_error_echoes_submitted_value() {
		let (server, _) = server().await;

		let response = server
			.post("/comment/")
			.json(&json!({ "content": "Hello?", "post": "007" }))
			.await;

		assert_eq!(response.status_code(), 400);
		assert_eq!(
			response.json::<Value>(),
			json!({ "post": ["Invalid pk \"007\" - object does not exist."] })
		);
	}

	#[tokio::test]
	async fn test_create_comment_without_fields() {
		let (server, store) = server().await;

		let response = server.post("/comment/").json(&json!({})).await;

		assert_eq!(response.status_code(), 400);
		assert_eq!(
			response.json::<Value>(),
			json!({
				"content": ["This field is required."],
				"post": ["This field is required."],
			})
		);
		assert_eq!(count(store.database(), "comment").await, 0);
	}

	#[tokio::test]
	async fn test_create_comment_reports_missing_content_and_unknown_post() {
		let (server, _) = server().await;

		let response = server
			.post("/comment/")
			.json(&json!({ "post": 7 }))
			.await;

		assert_eq!(response.status_code(), 400);
		assert_eq!(
			response.json::<Value>(),
			json!({
				"content": ["This field is required."],
				"post": ["Invalid pk \"7\" - object does not exist."],
			})
		);
	}

	#[tokio::test]
	async fn test_create_comment_with_non_integer_post() {
		let (server, _) = server().await;

		let response = server
			.post("/comment/")
			.json(&json!({ "content": "Hi", "post": "first" }))
			.await;

		assert_eq!(response.status_code(), 400);
		assert_eq!(
			response.json::<Value>(),
			json!({ "post": ["Incorrect type. Expected pk value, received str."] })
		);
	}

	#[tokio::test]
	async fn test_comments_do_not_change_post_list() {
		let (server, store) = server().await;
		let first = store.create_post("first", None, None).await.unwrap();
		let second = store.create_post("second", None, None).await.unwrap();

		for _ in 0..3 {
			server
				.post("/comment/")
				.json(&json!({ "content": "again", "post": first.id }))
				.await;
		}

		let ids = server
			.get("/blog/")
			.await
			.json::<Vec<Value>>()
			.into_iter()
			.map(|post| post["id"].as_i64().unwrap())
			.collect::<Vec<_>>();

		assert_eq!(ids, [first.id, second.id]);
	}
}
