//! In-memory backend recording every call, for driver tests.

use crate::api::{
    ApiResult, AuthApi, CommentApi, DashboardApi, ImageUpload, Listing, PostApi, TopicApi,
};
use crate::error::ForumClientError;
use async_trait::async_trait;
use forum_core::endpoints::Endpoint;
use forum_core::models::{
    AdminStats, AuthResponse, Comment, CreateCommentRequest, CreatePostRequest, CreateTopicRequest,
    DatePoint, LoginRequest, Page, Post, PostPayload, PostSort, PostWithComments, Role, RoleCount,
    SignupRequest, Topic, TopicWithPosts, User, UserProfile,
};
use forum_core::{DashboardScope, DashboardSection, PageQuery};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub(crate) struct FakeForum {
    calls: Mutex<Vec<String>>,
    pub sections: Mutex<HashMap<DashboardSection, serde_json::Value>>,
    pub post: Mutex<Option<Post>>,
    pub comments: Mutex<Vec<Comment>>,
    pub replies: Mutex<HashMap<i64, Vec<Comment>>>,
    pub fail_writes: AtomicBool,
    pub authenticated: AtomicBool,
    /// Answer `get_post` with the comments embedded, like the real backend.
    pub embed_comments: AtomicBool,
    next_id: AtomicI64,
}

impl FakeForum {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(100),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn write(&self, call: impl Into<String>) -> ApiResult<()> {
        self.record(call);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ForumClientError::Status {
                status: 500,
                message: "write failed".to_string(),
            });
        }
        Ok(())
    }
}

pub(crate) fn post(id: i64, likes: u64, liked: bool) -> Post {
    Post {
        id,
        title: Some(format!("Post {}", id)),
        content: "body".to_string(),
        author_name: Some("ann".to_string()),
        topic_name: Some("rust".to_string()),
        created_at: None,
        likes_count: likes,
        comments_count: 0,
        liked,
        bookmarked: false,
        image_url: None,
        media_type: None,
    }
}

pub(crate) fn comment(id: i64, parent: Option<i64>) -> Comment {
    Comment {
        id,
        content: format!("comment {}", id),
        author_name: Some("bob".to_string()),
        created_at: None,
        parent_comment_id: parent,
        replies: Vec::new(),
    }
}

pub(crate) fn user(id: i64, banned: bool) -> User {
    User {
        id,
        name: format!("user{}", id),
        email: format!("user{}@example.com", id),
        roles: vec![Role::User],
        banned,
    }
}

#[async_trait]
impl AuthApi for FakeForum {
    async fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    async fn login(&self, req: &LoginRequest) -> ApiResult<AuthResponse> {
        self.record(format!("POST login {}", req.email));
        Ok(AuthResponse {
            token: "token".to_string(),
            email: Some(req.email.clone()),
        })
    }

    async fn signup(&self, req: &SignupRequest) -> ApiResult<String> {
        self.record(format!("POST signup {}", req.email));
        Ok("User registered successfully".to_string())
    }

    async fn logout(&self) -> ApiResult<()> {
        self.write("POST logout")
    }

    async fn current_user(&self) -> ApiResult<User> {
        self.record("GET me");
        Ok(user(1, false))
    }

    async fn profile(&self) -> ApiResult<UserProfile> {
        self.record("GET profile");
        Ok(UserProfile::default())
    }
}

#[async_trait]
impl TopicApi for FakeForum {
    async fn list_topics(&self, query: &PageQuery) -> ApiResult<Page<Topic>> {
        self.record(format!("GET topics page={}", query.page));
        Ok(Page::single(Vec::new()))
    }

    async fn create_topic(&self, req: &CreateTopicRequest) -> ApiResult<Topic> {
        self.write(format!("POST topic {}", req.name))?;
        Ok(Topic {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            name: req.name.clone(),
            description: Some(req.description.clone()),
            post_count: 0,
            creator_name: None,
            created_at: None,
        })
    }

    async fn get_topic(&self, id: i64) -> ApiResult<Topic> {
        self.record(format!("GET topic {}", id));
        Err(ForumClientError::NotFound)
    }

    async fn topic_posts(&self, id: i64, query: &PageQuery) -> ApiResult<Page<Post>> {
        self.record(format!("GET topic {} posts page={}", id, query.page));
        Ok(Page::single(Vec::new()))
    }

    async fn topic_details(&self, id: i64, _sort: &PostSort) -> ApiResult<TopicWithPosts> {
        self.record(format!("GET topic {} details", id));
        Err(ForumClientError::NotFound)
    }
}

#[async_trait]
impl PostApi for FakeForum {
    async fn list_posts(&self, query: &PageQuery) -> ApiResult<Page<Post>> {
        self.record(format!("GET posts page={}", query.page));
        Ok(Page::single(Vec::new()))
    }

    async fn create_post(&self, req: &CreatePostRequest, image: Option<ImageUpload>) -> ApiResult<Post> {
        self.write(format!("POST post {} image={}", req.title, image.is_some()))?;
        Ok(post(self.next_id.fetch_add(1, Ordering::SeqCst), 0, false))
    }

    async fn get_post(&self, id: i64) -> ApiResult<PostPayload> {
        self.record(format!("GET post {}", id));
        let post = self.post.lock().unwrap().clone().ok_or(ForumClientError::NotFound)?;
        if self.embed_comments.load(Ordering::SeqCst) {
            let comments = self.comments.lock().unwrap().clone();
            return Ok(PostPayload::WithComments(PostWithComments { post, comments }));
        }
        Ok(PostPayload::Bare(post))
    }

    async fn like_post(&self, id: i64) -> ApiResult<()> {
        self.write(format!("POST like {}", id))
    }

    async fn unlike_post(&self, id: i64) -> ApiResult<()> {
        self.write(format!("DELETE like {}", id))
    }

    async fn bookmark_post(&self, id: i64) -> ApiResult<()> {
        self.write(format!("POST bookmark {}", id))
    }
}

#[async_trait]
impl CommentApi for FakeForum {
    async fn post_comments(&self, post_id: i64) -> ApiResult<Vec<Comment>> {
        self.record(format!("GET comments {}", post_id));
        Ok(self.comments.lock().unwrap().clone())
    }

    async fn create_comment(&self, req: &CreateCommentRequest) -> ApiResult<Comment> {
        self.write(format!(
            "POST comment post={} parent={:?} {}",
            req.post_id, req.parent_comment_id, req.content
        ))?;
        let created = Comment {
            content: req.content.clone(),
            ..comment(self.next_id.fetch_add(1, Ordering::SeqCst), req.parent_comment_id)
        };
        self.comments.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn comment_replies(&self, comment_id: i64) -> ApiResult<Vec<Comment>> {
        self.record(format!("GET replies {}", comment_id));
        Ok(self
            .replies
            .lock()
            .unwrap()
            .get(&comment_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl DashboardApi for FakeForum {
    async fn dashboard_list<T: Listing>(
        &self,
        scope: DashboardScope,
        query: &PageQuery,
    ) -> ApiResult<Page<T>> {
        self.record(format!("GET {}/{} page={}", scope, T::SECTION, query.page));
        let raw = self
            .sections
            .lock()
            .unwrap()
            .get(&T::SECTION)
            .cloned()
            .unwrap_or_else(|| serde_json::json!({ "content": [], "totalPages": 0 }));
        Ok(serde_json::from_value(raw)?)
    }

    async fn execute(&self, endpoint: &Endpoint) -> ApiResult<()> {
        self.write(format!("{} {}", endpoint.method, endpoint.path))
    }

    async fn admin_stats(&self) -> ApiResult<AdminStats> {
        self.record("GET stats");
        Ok(AdminStats {
            total_users: 3,
            ..AdminStats::default()
        })
    }

    async fn posts_over_time(&self) -> ApiResult<Vec<DatePoint>> {
        self.record("GET posts-over-time");
        Ok(vec![DatePoint {
            date: "2024-05-01".to_string(),
            count: 2,
        }])
    }

    async fn roles_distribution(&self) -> ApiResult<Vec<RoleCount>> {
        self.record("GET roles-distribution");
        Ok(vec![RoleCount {
            role: "USER".to_string(),
            count: 3,
        }])
    }
}
