use aide::{openapi::Tag, transform::TransformOpenApi};

use crate::{error, extract::Json};

pub mod tag {
	pub const BLOG: &str = "Blog";
	pub const COMMENT: &str = "Comment";
}

pub fn docs(api: TransformOpenApi) -> TransformOpenApi {
	api.title("Blog API")
		.summary("A minimal blogging backend")
		.description(include_str!("../README.md"))
		.tag(Tag {
			name: tag::BLOG.into(),
			description: Some("Blog post management".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::COMMENT.into(),
			description: Some("Comments on blog posts".into()),
			..Default::default()
		})
		.default_response_with::<Json<error::Detail>, _>(|res| {
			res.example(error::Detail {
				detail: "A server error occurred.".into(),
			})
		})
}
