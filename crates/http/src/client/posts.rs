//! Blog post API client methods

use super::{ApiClient, ClientError};
use crate::types::{ImageUpload, NewPost, PostEnvelope, PostUpdate, PostsEnvelope};
use inkpost_core::Post;
use reqwest::Method;
use reqwest::multipart::{Form, Part};

impl ApiClient {
    /// List all posts, published or not
    pub async fn list_posts(&self) -> Result<Vec<Post>, ClientError> {
        let req = self.request(Method::GET, &["posts", "posts"]);
        let envelope: PostsEnvelope = self.execute(req).await?;
        Ok(envelope.posts)
    }

    pub async fn get_post(&self, id: &str) -> Result<Post, ClientError> {
        let req = self.request(Method::GET, &["posts", "post", id]);
        let envelope: PostEnvelope = self.execute(req).await?;
        Ok(envelope.post)
    }

    pub async fn get_post_by_slug(&self, slug: &str) -> Result<Post, ClientError> {
        let req = self.request(Method::GET, &["posts", "post-by-slug", slug]);
        let envelope: PostEnvelope = self.execute(req).await?;
        Ok(envelope.post)
    }

    /// Create a post (requires an admin session)
    pub async fn create_post(&self, post: &NewPost) -> Result<Post, ClientError> {
        let req = self
            .request(Method::POST, &["posts", "create-post"])
            .multipart(new_post_form(post)?);
        let envelope: PostEnvelope = self.execute(req).await?;
        Ok(envelope.post)
    }

    /// Update a post (requires an admin session)
    pub async fn update_post(&self, id: &str, update: &PostUpdate) -> Result<Post, ClientError> {
        let req = self
            .request(Method::PUT, &["posts", "update-post", id])
            .multipart(post_update_form(update)?);
        let envelope: PostEnvelope = self.execute(req).await?;
        Ok(envelope.post)
    }

    /// Delete a post (requires an admin session)
    pub async fn delete_post(&self, id: &str) -> Result<(), ClientError> {
        let req = self.request(Method::DELETE, &["posts", "delete-post", id]);
        self.execute_empty(req).await
    }
}

fn image_part(image: &ImageUpload) -> Result<Part, ClientError> {
    Ok(Part::bytes(image.bytes.clone())
        .file_name(image.file_name.clone())
        .mime_str(&image.mime_type)?)
}

fn attach_images(
    mut form: Form,
    main_image: Option<&ImageUpload>,
    other_images: &[ImageUpload],
) -> Result<Form, ClientError> {
    if let Some(image) = main_image {
        form = form.part("mainImage", image_part(image)?);
    }
    for image in other_images {
        form = form.part("otherImages", image_part(image)?);
    }
    Ok(form)
}

fn new_post_form(post: &NewPost) -> Result<Form, ClientError> {
    let mut form = Form::new()
        .text("title", post.title.clone())
        .text("content", post.content.clone())
        .text("author", post.author.clone());

    if let Some(tags) = post.tags.as_ref().filter(|t| !t.is_empty()) {
        form = form.text("tags", tags.clone());
    }
    if let Some(category) = post.category.as_ref().filter(|c| !c.is_empty()) {
        form = form.text("category", category.clone());
    }
    if let Some(is_published) = post.is_published {
        form = form.text("isPublished", is_published.to_string());
    }
    if let Some(excerpt) = post.excerpt.as_ref().filter(|e| !e.is_empty()) {
        form = form.text("excerpt", excerpt.clone());
    }

    attach_images(form, post.main_image.as_ref(), &post.other_images)
}

fn post_update_form(update: &PostUpdate) -> Result<Form, ClientError> {
    let mut form = Form::new();

    for (name, value) in [
        ("title", &update.title),
        ("content", &update.content),
        ("author", &update.author),
        ("tags", &update.tags),
    ] {
        if let Some(value) = value.as_ref().filter(|v| !v.is_empty()) {
            form = form.text(name, value.clone());
        }
    }
    if update.remove_main_image {
        form = form.text("removeMainImage", "true");
    }
    if !update.remove_other_image_ids.is_empty() {
        form = form.text("removeOtherImageIds", update.remove_other_image_ids.join(","));
    }

    attach_images(form, update.main_image.as_ref(), &update.other_images)
}
