//! REST paths of the forum backend, relative to the server origin.

use crate::list::PageQuery;
use crate::models::PostSort;
use std::fmt;
use url::form_urlencoded;

pub const API_PREFIX: &str = "/api";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        })
    }
}

/// A request line without a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub method: Method,
    pub path: String,
}

impl Endpoint {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
        }
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            path: path.into(),
        }
    }
}

fn api(path: &str) -> String {
    format!("{}{}", API_PREFIX, path)
}

pub fn with_query(path: String, query: &PageQuery) -> String {
    format!("{}?{}", path, query.to_query_string())
}

// auth
pub fn login() -> String {
    api("/auth/login")
}

pub fn signup() -> String {
    api("/auth/signup")
}

pub fn logout() -> String {
    api("/auth/logout")
}

pub fn current_user() -> String {
    api("/users/current")
}

pub fn profile() -> String {
    api("/user/profile")
}

// topics
pub fn topics() -> String {
    api("/topics")
}

pub fn topic(id: i64) -> String {
    api(&format!("/topics/{}", id))
}

pub fn topic_posts(id: i64) -> String {
    api(&format!("/topics/{}/posts", id))
}

pub fn topic_details(id: i64, sort: &PostSort) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("sort", &sort.to_string())
        .finish();
    api(&format!("/topics/{}/details?{}", id, query))
}

// posts
pub fn posts() -> String {
    api("/posts")
}

pub fn post(id: i64) -> String {
    api(&format!("/posts/{}", id))
}

pub fn post_like(id: i64) -> String {
    api(&format!("/posts/{}/like", id))
}

pub fn post_bookmark(id: i64) -> String {
    api(&format!("/posts/{}/bookmark", id))
}

// comments
pub fn comments() -> String {
    api("/comments")
}

pub fn post_comments(post_id: i64) -> String {
    api(&format!("/comments/post/{}", post_id))
}

pub fn comment_replies(comment_id: i64) -> String {
    api(&format!("/comments/{}/replies", comment_id))
}

// admin statistics
pub fn admin_stats() -> String {
    api("/admin/stats")
}

pub fn admin_posts_over_time() -> String {
    api("/admin/posts/over-time")
}

pub fn admin_roles_distribution() -> String {
    api("/admin/users/roles-distribution")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_carry_api_prefix() {
        assert_eq!(post_comments(5), "/api/comments/post/5");
        assert_eq!(comment_replies(9), "/api/comments/9/replies");
        assert_eq!(
            topic_details(2, &PostSort::default()),
            "/api/topics/2/details?sort=createdAt%2Cdesc"
        );
        assert_eq!(
            with_query(topic_posts(3), &PageQuery::new(1, 10, "")),
            "/api/topics/3/posts?page=1&size=10&search="
        );
    }
}
