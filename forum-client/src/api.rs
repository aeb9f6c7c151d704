//! The backend seen as a set of async traits.
//!
//! [`HttpClient`](crate::http_client::HttpClient) implements all of them; the
//! drivers only ask for the slice they use.

use crate::error::ForumClientError;
use async_trait::async_trait;
use forum_core::endpoints::Endpoint;
use forum_core::models::{
    AdminStats, AuthResponse, Comment, CreateCommentRequest, CreatePostRequest, CreateTopicRequest,
    DatePoint, LoginRequest, Page, Post, PostPayload, PostSort, RoleCount, SignupRequest, Topic,
    TopicWithPosts, User, UserProfile,
};
use forum_core::{DashboardScope, DashboardSection, PageQuery};
use serde::de::DeserializeOwned;

pub type ApiResult<T> = Result<T, ForumClientError>;

/// Image attached to a new post.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Guesses the MIME type from the file extension.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        let mime_type = match extension.as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "mp4" => "video/mp4",
            _ => "application/octet-stream",
        }
        .to_string();
        Self {
            file_name,
            mime_type,
            bytes,
        }
    }
}

/// Records listed on a dashboard section.
pub trait Listing: DeserializeOwned + Send + 'static {
    const SECTION: DashboardSection;
}

impl Listing for Post {
    const SECTION: DashboardSection = DashboardSection::Posts;
}

impl Listing for Comment {
    const SECTION: DashboardSection = DashboardSection::Comments;
}

impl Listing for Topic {
    const SECTION: DashboardSection = DashboardSection::Topics;
}

impl Listing for User {
    const SECTION: DashboardSection = DashboardSection::Users;
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Whether a token is held right now. A 401 anywhere clears it.
    async fn is_authenticated(&self) -> bool;
    /// Logs in and keeps the returned token for later requests.
    async fn login(&self, req: &LoginRequest) -> ApiResult<AuthResponse>;
    /// Returns the server's confirmation message.
    async fn signup(&self, req: &SignupRequest) -> ApiResult<String>;
    /// Invalidates the token server-side and forgets it locally.
    async fn logout(&self) -> ApiResult<()>;
    async fn current_user(&self) -> ApiResult<User>;
    async fn profile(&self) -> ApiResult<UserProfile>;
}

#[async_trait]
pub trait TopicApi: Send + Sync {
    async fn list_topics(&self, query: &PageQuery) -> ApiResult<Page<Topic>>;
    async fn create_topic(&self, req: &CreateTopicRequest) -> ApiResult<Topic>;
    async fn get_topic(&self, id: i64) -> ApiResult<Topic>;
    async fn topic_posts(&self, id: i64, query: &PageQuery) -> ApiResult<Page<Post>>;
    async fn topic_details(&self, id: i64, sort: &PostSort) -> ApiResult<TopicWithPosts>;
}

#[async_trait]
pub trait PostApi: Send + Sync {
    async fn list_posts(&self, query: &PageQuery) -> ApiResult<Page<Post>>;
    async fn create_post(&self, req: &CreatePostRequest, image: Option<ImageUpload>) -> ApiResult<Post>;
    /// The post, with its comments when the server embeds them.
    async fn get_post(&self, id: i64) -> ApiResult<PostPayload>;
    async fn like_post(&self, id: i64) -> ApiResult<()>;
    async fn unlike_post(&self, id: i64) -> ApiResult<()>;
    async fn bookmark_post(&self, id: i64) -> ApiResult<()>;
}

#[async_trait]
pub trait CommentApi: Send + Sync {
    async fn post_comments(&self, post_id: i64) -> ApiResult<Vec<Comment>>;
    async fn create_comment(&self, req: &CreateCommentRequest) -> ApiResult<Comment>;
    async fn comment_replies(&self, comment_id: i64) -> ApiResult<Vec<Comment>>;
}

#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn dashboard_list<T: Listing>(
        &self,
        scope: DashboardScope,
        query: &PageQuery,
    ) -> ApiResult<Page<T>>;
    /// Issues a body-less write such as a dashboard mutation.
    async fn execute(&self, endpoint: &Endpoint) -> ApiResult<()>;
    async fn admin_stats(&self) -> ApiResult<AdminStats>;
    async fn posts_over_time(&self) -> ApiResult<Vec<DatePoint>>;
    async fn roles_distribution(&self) -> ApiResult<Vec<RoleCount>>;
}

/// Everything the backend offers.
pub trait ForumApi: AuthApi + TopicApi + PostApi + CommentApi + DashboardApi {}

impl<T> ForumApi for T where T: AuthApi + TopicApi + PostApi + CommentApi + DashboardApi {}
