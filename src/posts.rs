use serde::{Deserialize, Serialize};

use crate::{client::ApiClient, error::SessionError, types::UnverifiedIdentity};

/// Fallback shown when the board cannot be loaded.
pub const POSTS_LOAD_FAILED: &str = "failed to load posts";
/// Fallback shown when saving a post is rejected.
pub const POST_SAVE_FAILED: &str = "failed to save post";
/// Fallback shown when deleting a post is rejected.
pub const POST_DELETE_FAILED: &str = "failed to delete post";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author_id: i64,
    pub author_username: String,
    pub created_at: String,
}

impl Post {
    /// Whether the given advisory identity may edit or delete this post: the
    /// author, or an admin. The server enforces the same rule for real.
    pub fn can_modify(&self, user: &UnverifiedIdentity) -> bool {
        user.id == self.author_id || user.has_role("ROLE_ADMIN")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
}

/// Typed client for the board endpoints. Every call goes through the bearer
/// pipeline; the server decides what an unauthenticated caller may see.
#[derive(Clone)]
pub struct PostsClient {
    api: ApiClient,
}

impl PostsClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Post>, SessionError> {
        self.api.get_json("posts").await
    }

    pub async fn get(&self, id: i64) -> Result<Post, SessionError> {
        self.api.get_json(&format!("posts/{id}")).await
    }

    pub async fn create(&self, draft: &PostDraft) -> Result<Post, SessionError> {
        self.api.post_json("posts", draft).await
    }

    pub async fn update(&self, id: i64, draft: &PostDraft) -> Result<Post, SessionError> {
        self.api.put_json(&format!("posts/{id}"), draft).await
    }

    pub async fn remove(&self, id: i64) -> Result<(), SessionError> {
        self.api.delete(&format!("posts/{id}")).await
    }
}
