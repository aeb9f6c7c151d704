use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==================== Пользователи ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Moderator,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Moderator => "MODERATOR",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USER" => Ok(Role::User),
            "MODERATOR" => Ok(Role::Moderator),
            "ADMIN" => Ok(Role::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub banned: bool,
}

impl User {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// The role shown in the dashboard role selector.
    pub fn primary_role(&self) -> Role {
        if self.has_role(Role::Admin) {
            Role::Admin
        } else if self.has_role(Role::Moderator) {
            Role::Moderator
        } else {
            Role::User
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub join_date: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(default)]
    pub email: Option<String>,
}

// ==================== Топики ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub post_count: u64,
    #[serde(default)]
    pub creator_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTopicRequest {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicWithPosts {
    pub topic: Topic,
    pub posts: Page<Post>,
}

/// `field,direction` pair accepted by the topic details endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSort {
    pub field: String,
    pub descending: bool,
}

impl Default for PostSort {
    fn default() -> Self {
        Self {
            field: "createdAt".to_string(),
            descending: true,
        }
    }
}

impl fmt::Display for PostSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = if self.descending { "desc" } else { "asc" };
        write!(f, "{},{}", self.field, direction)
    }
}

impl FromStr for PostSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = match s.split_once(',') {
            Some((field, direction)) => (field.trim(), direction.trim()),
            None => (s.trim(), "desc"),
        };
        if field.is_empty() {
            return Err("sort field is empty".to_string());
        }
        let descending = match direction.to_ascii_lowercase().as_str() {
            "desc" => true,
            "asc" => false,
            other => return Err(format!("unknown sort direction: {}", other)),
        };
        Ok(Self {
            field: field.to_string(),
            descending,
        })
    }
}

// ==================== Посты ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    pub content: String,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub topic_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub likes_count: u64,
    #[serde(default)]
    pub comments_count: u64,
    #[serde(default)]
    pub liked: bool,
    #[serde(default)]
    pub bookmarked: bool,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub media_type: Option<String>,
}

impl Post {
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => "Untitled Post",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub topic_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostWithComments {
    pub post: Post,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// Body of `GET /posts/:id`: the post bundled with its comments, or the
/// bare post on servers that serve comments separately.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PostPayload {
    WithComments(PostWithComments),
    Bare(Post),
}

impl PostPayload {
    pub fn post(&self) -> &Post {
        match self {
            PostPayload::WithComments(detail) => &detail.post,
            PostPayload::Bare(post) => post,
        }
    }

    /// Splits into the post and, when bundled, its comments.
    pub fn into_parts(self) -> (Post, Option<Vec<Comment>>) {
        match self {
            PostPayload::WithComments(detail) => (detail.post, Some(detail.comments)),
            PostPayload::Bare(post) => (post, None),
        }
    }
}

// ==================== Комментарии ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub content: String,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub parent_comment_id: Option<i64>,
    #[serde(default)]
    pub replies: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub content: String,
    pub post_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_comment_id: Option<i64>,
}

// ==================== Страницы ====================

/// Spring Data page envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub size: u32,
}

impl<T> Page<T> {
    /// Wraps an unpaginated list as the only page.
    pub fn single(content: Vec<T>) -> Self {
        let len = content.len();
        Self {
            content,
            total_pages: 1,
            total_elements: len as u64,
            number: 0,
            size: len as u32,
        }
    }

    /// Converts the items, keeping the paging figures.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_pages: self.total_pages,
            total_elements: self.total_elements,
            number: self.number,
            size: self.size,
        }
    }
}

/// Some endpoints answer with a page, others with a bare array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PageOrList<T> {
    List(Vec<T>),
    Page(Page<T>),
}

impl<T> From<PageOrList<T>> for Page<T> {
    fn from(value: PageOrList<T>) -> Self {
        match value {
            PageOrList::List(items) => Page::single(items),
            PageOrList::Page(page) => page,
        }
    }
}

// ==================== Статистика ====================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub total_posts: u64,
    #[serde(default)]
    pub total_comments: u64,
    #[serde(default)]
    pub total_topics: u64,
    #[serde(default)]
    pub banned_users: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatePoint {
    pub date: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleCount {
    pub role: String,
    pub count: u64,
}

// ==================== Общие ошибки ====================

/// Error body; Spring sends both fields, hand-written handlers only one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn into_message(self) -> Option<String> {
        self.message
            .filter(|m| !m.trim().is_empty())
            .or(self.error)
            .filter(|m| !m.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_accepts_sparse_payload() {
        let post: Post = serde_json::from_value(serde_json::json!({
            "id": 7,
            "content": "hello",
            "createdAt": "2024-03-01T12:30:00"
        }))
        .unwrap();

        assert_eq!(post.display_title(), "Untitled Post");
        assert_eq!(post.likes_count, 0);
        assert!(!post.liked);
        assert!(post.created_at.is_some());
    }

    #[test]
    fn post_detail_envelope_carries_comments() {
        let payload: PostPayload = serde_json::from_value(serde_json::json!({
            "post": {
                "id": 5,
                "title": "Borrowing",
                "content": "hello",
                "authorName": "ann",
                "topicName": "rust",
                "createdAt": "2024-03-01T12:30:00",
                "likesCount": 2,
                "commentsCount": 1,
                "liked": true,
                "bookmarked": false,
                "imageUrl": null,
                "mediaType": null
            },
            "comments": [{
                "id": 1,
                "content": "nice",
                "authorName": "bob",
                "createdAt": "2024-03-01T13:00:00",
                "parentCommentId": null,
                "replies": [{"id": 2, "content": "thanks", "parentCommentId": 1, "replies": []}]
            }]
        }))
        .unwrap();

        assert_eq!(payload.post().id, 5);
        let (post, comments) = payload.into_parts();
        assert!(post.liked);
        let comments = comments.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].replies[0].id, 2);
    }

    #[test]
    fn bare_post_body_is_still_accepted() {
        let payload: PostPayload =
            serde_json::from_value(serde_json::json!({"id": 9, "content": "solo"})).unwrap();
        assert_eq!(payload.into_parts().1, None);
    }

    #[test]
    fn comment_request_omits_missing_parent() {
        let req = CreateCommentRequest {
            content: "hi".into(),
            post_id: 3,
            parent_comment_id: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({"content": "hi", "postId": 3}));
    }

    #[test]
    fn bare_array_becomes_single_page() {
        let raw: PageOrList<Topic> = serde_json::from_value(serde_json::json!([
            {"id": 1, "name": "rust"},
            {"id": 2, "name": "go"}
        ]))
        .unwrap();
        let page: Page<Topic> = raw.into();
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.content.len(), 2);
    }

    #[test]
    fn spring_page_is_read_as_page() {
        let raw: PageOrList<Topic> = serde_json::from_value(serde_json::json!({
            "content": [{"id": 1, "name": "rust"}],
            "totalPages": 4,
            "totalElements": 31,
            "number": 2,
            "size": 10
        }))
        .unwrap();
        let page: Page<Topic> = raw.into();
        assert_eq!(page.total_pages, 4);
        assert_eq!(page.number, 2);
    }

    #[test]
    fn map_keeps_paging_figures() {
        let page = Page {
            content: vec![1, 2],
            total_pages: 3,
            total_elements: 22,
            number: 1,
            size: 10,
        }
        .map(|n| n * 10);
        assert_eq!(page.content, vec![10, 20]);
        assert_eq!((page.total_pages, page.number), (3, 1));
    }

    #[test]
    fn roles_use_upper_case_on_the_wire() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": 1,
            "name": "ann",
            "email": "ann@example.com",
            "roles": ["USER", "MODERATOR"]
        }))
        .unwrap();
        assert_eq!(user.primary_role(), Role::Moderator);
        assert!(!user.banned);
        assert_eq!("moderator".parse::<Role>().unwrap(), Role::Moderator);
    }

    #[test]
    fn sort_parses_field_and_direction() {
        let sort: PostSort = "likesCount,asc".parse().unwrap();
        assert_eq!(sort.to_string(), "likesCount,asc");
        assert_eq!(PostSort::default().to_string(), "createdAt,desc");
        assert!("title,sideways".parse::<PostSort>().is_err());
    }
}
