use crate::api::{
    ApiResult, AuthApi, CommentApi, DashboardApi, ImageUpload, Listing, PostApi, TopicApi,
};
use crate::config::ClientConfig;
use crate::error::ForumClientError;
use async_trait::async_trait;
use forum_core::endpoints::{self, Endpoint, Method};
use forum_core::models::{
    AdminStats, AuthResponse, Comment, CreateCommentRequest, CreatePostRequest, CreateTopicRequest,
    DatePoint, ErrorResponse, LoginRequest, Page, PageOrList, Post, PostPayload, PostSort, RoleCount,
    SignupRequest, Topic, TopicWithPosts, User, UserProfile,
};
use forum_core::{DashboardScope, PageQuery};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Arc<Mutex<Option<String>>>,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ForumClientError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            token: Arc::new(Mutex::new(None)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn set_token(&self, token: String) {
        *self.token.lock().await = Some(token);
    }

    pub async fn get_token(&self) -> Option<String> {
        self.token.lock().await.clone()
    }

    pub async fn clear_token(&self) {
        *self.token.lock().await = None;
    }

    async fn add_auth_header(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token.lock().await.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn send(&self, method: Method, path: &str, request: RequestBuilder) -> ApiResult<Response> {
        tracing::debug!("{} {}", method, path);
        let response = self
            .add_auth_header(request)
            .await
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Network error - no response from server: {} {}: {}", method, path, e);
                ForumClientError::from(e)
            })?;

        self.check_status(method, path, response).await
    }

    async fn check_status(&self, method: Method, path: &str, response: Response) -> ApiResult<Response> {
        let status = response.status();
        if status.is_success() {
            tracing::debug!("{} {} -> {}", method, path, status);
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body, status);

        match status {
            StatusCode::UNAUTHORIZED => {
                tracing::error!("Authentication error: {} {}: {}", method, path, message);
                self.clear_token().await;
                Err(ForumClientError::Unauthorized(message))
            }
            StatusCode::FORBIDDEN => {
                tracing::error!("Forbidden: {} {}: {}", method, path, message);
                Err(ForumClientError::Forbidden(message))
            }
            StatusCode::NOT_FOUND => {
                tracing::warn!("Not found: {} {}", method, path);
                Err(ForumClientError::NotFound)
            }
            _ => {
                tracing::error!("Error {}: {} {}: {}", status.as_u16(), method, path, message);
                Err(ForumClientError::Status {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let request = self.client.get(self.url(path));
        let response = self.send(Method::Get, path, request).await?;
        decode(response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.client.post(self.url(path)).json(body);
        let response = self.send(Method::Post, path, request).await?;
        decode(response).await
    }

    async fn get_page<T: DeserializeOwned>(&self, path: String, query: &PageQuery) -> ApiResult<Page<T>> {
        let path = endpoints::with_query(path, query);
        let raw: PageOrList<T> = self.get_json(&path).await?;
        Ok(raw.into())
    }

    async fn send_empty(&self, endpoint: &Endpoint) -> ApiResult<()> {
        let url = self.url(&endpoint.path);
        let request = match endpoint.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
            Method::Delete => self.client.delete(url),
        };
        self.send(endpoint.method, &endpoint.path, request).await?;
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| {
        tracing::error!("Failed to parse response: {}", e);
        ForumClientError::SerializationError(e.to_string())
    })
}

/// Pulls a human-readable message out of an error body.
fn error_message(body: &str, status: StatusCode) -> String {
    let body = body.trim();
    if body.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string();
    }
    if let Ok(Some(message)) = serde_json::from_str::<ErrorResponse>(body).map(ErrorResponse::into_message) {
        return message;
    }
    if let Ok(text) = serde_json::from_str::<String>(body) {
        return text;
    }
    body.to_string()
}

#[async_trait]
impl AuthApi for HttpClient {
    async fn is_authenticated(&self) -> bool {
        self.token.lock().await.is_some()
    }

    async fn login(&self, req: &LoginRequest) -> ApiResult<AuthResponse> {
        tracing::debug!("Login called for: {}", req.email);
        let response: AuthResponse = self.post_json(&endpoints::login(), req).await?;
        self.set_token(response.token.clone()).await;
        Ok(response)
    }

    async fn signup(&self, req: &SignupRequest) -> ApiResult<String> {
        tracing::debug!("Signup called for: {}", req.email);
        let path = endpoints::signup();
        let request = self.client.post(self.url(&path)).json(req);
        let response = self.send(Method::Post, &path, request).await?;
        Ok(response.text().await?)
    }

    async fn logout(&self) -> ApiResult<()> {
        let result = self.send_empty(&Endpoint::post(endpoints::logout())).await;
        self.clear_token().await;
        if let Err(e) = &result {
            tracing::warn!("Logout failed: {}", e);
        }
        result
    }

    async fn current_user(&self) -> ApiResult<User> {
        self.get_json(&endpoints::current_user()).await
    }

    async fn profile(&self) -> ApiResult<UserProfile> {
        self.get_json(&endpoints::profile()).await
    }
}

#[async_trait]
impl TopicApi for HttpClient {
    async fn list_topics(&self, query: &PageQuery) -> ApiResult<Page<Topic>> {
        self.get_page(endpoints::topics(), query).await
    }

    async fn create_topic(&self, req: &CreateTopicRequest) -> ApiResult<Topic> {
        self.post_json(&endpoints::topics(), req).await
    }

    async fn get_topic(&self, id: i64) -> ApiResult<Topic> {
        self.get_json(&endpoints::topic(id)).await
    }

    async fn topic_posts(&self, id: i64, query: &PageQuery) -> ApiResult<Page<Post>> {
        self.get_page(endpoints::topic_posts(id), query).await
    }

    async fn topic_details(&self, id: i64, sort: &PostSort) -> ApiResult<TopicWithPosts> {
        self.get_json(&endpoints::topic_details(id, sort)).await
    }
}

#[async_trait]
impl PostApi for HttpClient {
    async fn list_posts(&self, query: &PageQuery) -> ApiResult<Page<Post>> {
        self.get_page(endpoints::posts(), query).await
    }

    async fn create_post(&self, req: &CreatePostRequest, image: Option<ImageUpload>) -> ApiResult<Post> {
        let path = endpoints::posts();
        let post_part = Part::text(serde_json::to_string(req)?).mime_str("application/json")?;
        let mut form = Form::new().part("post", post_part);
        if let Some(image) = image {
            tracing::debug!("Attaching image {} ({} bytes)", image.file_name, image.bytes.len());
            let image_part = Part::bytes(image.bytes)
                .file_name(image.file_name)
                .mime_str(&image.mime_type)?;
            form = form.part("image", image_part);
        }

        let request = self.client.post(self.url(&path)).multipart(form);
        let response = self.send(Method::Post, &path, request).await?;
        decode(response).await
    }

    async fn get_post(&self, id: i64) -> ApiResult<PostPayload> {
        self.get_json(&endpoints::post(id)).await
    }

    async fn like_post(&self, id: i64) -> ApiResult<()> {
        self.send_empty(&Endpoint::post(endpoints::post_like(id))).await
    }

    async fn unlike_post(&self, id: i64) -> ApiResult<()> {
        self.send_empty(&Endpoint::delete(endpoints::post_like(id))).await
    }

    async fn bookmark_post(&self, id: i64) -> ApiResult<()> {
        self.send_empty(&Endpoint::post(endpoints::post_bookmark(id))).await
    }
}

#[async_trait]
impl CommentApi for HttpClient {
    async fn post_comments(&self, post_id: i64) -> ApiResult<Vec<Comment>> {
        self.get_json(&endpoints::post_comments(post_id)).await
    }

    async fn create_comment(&self, req: &CreateCommentRequest) -> ApiResult<Comment> {
        self.post_json(&endpoints::comments(), req).await
    }

    async fn comment_replies(&self, comment_id: i64) -> ApiResult<Vec<Comment>> {
        self.get_json(&endpoints::comment_replies(comment_id)).await
    }
}

#[async_trait]
impl DashboardApi for HttpClient {
    async fn dashboard_list<T: Listing>(
        &self,
        scope: DashboardScope,
        query: &PageQuery,
    ) -> ApiResult<Page<T>> {
        let path = scope.list_path(T::SECTION)?;
        self.get_page(path, query).await
    }

    async fn execute(&self, endpoint: &Endpoint) -> ApiResult<()> {
        self.send_empty(endpoint).await
    }

    async fn admin_stats(&self) -> ApiResult<AdminStats> {
        self.get_json(&endpoints::admin_stats()).await
    }

    async fn posts_over_time(&self) -> ApiResult<Vec<DatePoint>> {
        self.get_json(&endpoints::admin_posts_over_time()).await
    }

    async fn roles_distribution(&self) -> ApiResult<Vec<RoleCount>> {
        self.get_json(&endpoints::admin_roles_distribution()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::one_shot_server;
    use std::net::TcpListener;

    fn client(base_url: &str) -> HttpClient {
        HttpClient::new(&ClientConfig::default().with_base_url(base_url)).unwrap()
    }

    #[test]
    fn url_joins_without_double_slash() {
        let client = client("http://localhost:8080/");
        assert_eq!(client.url("/api/topics"), "http://localhost:8080/api/topics");
    }

    #[test]
    fn error_message_prefers_json_error_field() {
        assert_eq!(
            error_message(r#"{"message":"Post not found"}"#, StatusCode::NOT_FOUND),
            "Post not found"
        );
        assert_eq!(error_message("plain text", StatusCode::BAD_REQUEST), "plain text");
        assert_eq!(error_message("", StatusCode::BAD_GATEWAY), "Bad Gateway");
    }

    #[tokio::test]
    async fn unauthorized_response_clears_token() {
        let (addr, server) = one_shot_server("401 Unauthorized", r#"{"error":"token expired"}"#);
        let client = client(&addr);
        client.set_token("stale".to_string()).await;

        let err = client.current_user().await.unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(client.get_token().await, None);
        let request = server.join().unwrap();
        assert!(request.starts_with("GET /api/users/current"));
        assert!(request.to_ascii_lowercase().contains("authorization: bearer stale"));
    }

    #[tokio::test]
    async fn login_keeps_token() {
        let (addr, server) = one_shot_server("200 OK", r#"{"token":"jwt-123","email":"ann@example.com"}"#);
        let client = client(&addr);

        let response = client
            .login(&LoginRequest {
                email: "ann@example.com".into(),
                password: "secret".into(),
            })
            .await
            .unwrap();

        assert_eq!(response.token, "jwt-123");
        assert_eq!(client.get_token().await.as_deref(), Some("jwt-123"));
        assert!(server.join().unwrap().starts_with("POST /api/auth/login"));
    }

    #[tokio::test]
    async fn dashboard_list_sends_page_params() {
        let (addr, server) = one_shot_server(
            "200 OK",
            r#"{"content":[{"id":1,"name":"ann","email":"a@x","roles":["USER"],"banned":true}],"totalPages":3}"#,
        );
        let client = client(&addr);

        let page: Page<User> = client
            .dashboard_list(DashboardScope::Admin, &PageQuery::new(1, 10, "ann"))
            .await
            .unwrap();

        assert_eq!(page.total_pages, 3);
        assert!(page.content[0].banned);
        assert!(server
            .join()
            .unwrap()
            .starts_with("GET /api/admin/users?page=1&size=10&search=ann"));
    }

    #[tokio::test]
    async fn post_detail_decodes_bundled_comments() {
        let (addr, server) = one_shot_server(
            "200 OK",
            r#"{"post":{"id":7,"title":"Hello","content":"body","authorName":"ann","likesCount":2,"liked":true},"comments":[{"id":1,"content":"first","parentCommentId":null,"replies":[{"id":2,"content":"re","parentCommentId":1}]}]}"#,
        );

        let payload = client(&addr).get_post(7).await.unwrap();

        assert_eq!(payload.post().id, 7);
        let (post, comments) = payload.into_parts();
        assert!(post.liked);
        assert_eq!(post.likes_count, 2);
        let comments = comments.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].replies[0].id, 2);
        assert!(server.join().unwrap().starts_with("GET /api/posts/7 "));
    }

    #[tokio::test]
    async fn connection_refused_is_a_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let err = client(&addr).get_post(1).await.unwrap_err();
        assert_eq!(err.kind(), forum_core::ErrorKind::Network);
    }
}
