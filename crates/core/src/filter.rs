//! Blog index search and category filtering

use crate::types::Post;

/// Search text and category selection for the blog index
///
/// Only published posts are ever listed. An empty search or category matches
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    pub search: String,
    pub category: String,
}

impl PostQuery {
    pub fn new(search: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            category: category.into(),
        }
    }

    /// Check whether a post should be listed for this query
    pub fn matches(&self, post: &Post) -> bool {
        if !post.is_published {
            return false;
        }

        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || [&post.title, &post.content, &post.slug, &post.excerpt]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));

        let matches_category = self.category.is_empty() || post.category == self.category;

        matches_search && matches_category
    }

    /// Filter posts, preserving their order
    pub fn apply<'a>(&self, posts: &'a [Post]) -> Vec<&'a Post> {
        posts.iter().filter(|post| self.matches(post)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty() && self.category.is_empty()
    }
}

/// Distinct non-blank categories in first-seen order
pub fn categories(posts: &[Post]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for post in posts {
        let category = post.category.trim();
        if !category.is_empty() && !seen.iter().any(|c| c == &post.category) {
            seen.push(post.category.clone());
        }
    }
    seen
}

/// Number of posts a reader can see at all
pub fn published_count(posts: &[Post]) -> usize {
    posts.iter().filter(|post| post.is_published).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn post(id: &str, title: &str, category: &str, published: bool) -> Post {
        Post {
            id: id.to_string(),
            title: title.to_string(),
            slug: title.to_lowercase().replace(' ', "-"),
            content: String::new(),
            author: "A".to_string(),
            tags: vec![],
            main_image: None,
            other_images: vec![],
            category: category.to_string(),
            is_published: published,
            excerpt: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_unpublished_posts_never_match() {
        let query = PostQuery::default();
        assert!(!query.matches(&post("1", "Draft", "tech", false)));
        assert!(query.matches(&post("2", "Live", "tech", true)));
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let mut p = post("1", "Rust Ownership", "tech", true);
        p.excerpt = "Borrowing explained".to_string();

        assert!(PostQuery::new("ownership", "").matches(&p));
        assert!(PostQuery::new("BORROWING", "").matches(&p));
        assert!(PostQuery::new("rust-own", "").matches(&p));
        assert!(!PostQuery::new("python", "").matches(&p));
    }

    #[test]
    fn test_category_must_match_exactly() {
        let posts = vec![
            post("1", "One", "tech", true),
            post("2", "Two", "life", true),
            post("3", "Three", "tech", false),
        ];

        let listed = PostQuery::new("", "tech").apply(&posts);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "1");
        assert_eq!(published_count(&posts), 2);
    }

    #[test]
    fn test_categories_skip_blank_and_duplicates() {
        let posts = vec![
            post("1", "One", "tech", true),
            post("2", "Two", "  ", true),
            post("3", "Three", "life", true),
            post("4", "Four", "tech", false),
        ];

        assert_eq!(categories(&posts), vec!["tech", "life"]);
    }
}
