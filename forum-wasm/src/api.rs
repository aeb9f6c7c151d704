use forum_core::endpoints::{self, Endpoint, Method};
use forum_core::models::{
    AdminStats, AuthResponse, Comment, CreateCommentRequest, CreatePostRequest, CreateTopicRequest,
    DatePoint, ErrorResponse, LoginRequest, Page, PageOrList, Post, PostPayload, RoleCount,
    SignupRequest, Topic, User,
};
use forum_core::{DashboardScope, DashboardSection, PageQuery};
use gloo_net::http::{Request, RequestBuilder, Response};
use gloo_storage::{LocalStorage, Storage};
use serde::{de::DeserializeOwned, Serialize};
use wasm_bindgen::JsValue;
use web_sys::{Blob, BlobPropertyBag, File, FormData};

const API_BASE: &str = "http://localhost:8080";
const TOKEN_KEY: &str = "forum_token";

#[derive(Debug, Clone, PartialEq)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new() -> Self {
        Self {
            base_url: API_BASE.to_string(),
        }
    }

    pub fn save_token(token: &str) {
        if let Err(e) = LocalStorage::set(TOKEN_KEY, token) {
            log::error!("Failed to save token: {:?}", e);
        }
    }

    pub fn get_token() -> Option<String> {
        LocalStorage::get(TOKEN_KEY).ok()
    }

    pub fn clear_token() {
        LocalStorage::delete(TOKEN_KEY);
    }

    pub fn is_authenticated() -> bool {
        Self::get_token().is_some()
    }

    fn builder(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = match method {
            Method::Get => Request::get(&url),
            Method::Post => Request::post(&url),
            Method::Delete => Request::delete(&url),
        };
        match Self::get_token() {
            Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
            None => builder,
        }
    }

    async fn send(&self, method: Method, path: &str, request: Result<Request, gloo_net::Error>) -> Result<Response, String> {
        log::debug!("{} {}", method, path);
        let request = request.map_err(|e| format!("Failed to build request: {}", e))?;
        let response = request.send().await.map_err(|e| {
            log::error!("{} {} failed: {}", method, path, e);
            format!("Network error: {}", e)
        })?;

        if response.ok() {
            return Ok(response);
        }

        let status = response.status();
        if status == 401 {
            Self::clear_token();
        }
        let text = response.text().await.unwrap_or_default();
        log::error!("{} {} returned {}: {}", method, path, status, text);
        Err(error_message(status, &text))
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl Serialize>,
    ) -> Result<T, String> {
        let builder = self.builder(method, path);
        let request = match body {
            Some(body) => builder.json(body),
            None => builder.build(),
        };
        let response = self.send(method, path, request).await?;
        let text = response
            .text()
            .await
            .map_err(|e| format!("Failed to read response: {}", e))?;
        serde_json::from_str(&text).map_err(|e| format!("Failed to parse response: {}", e))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, String> {
        self.request(Method::Get, path, None::<&()>).await
    }

    async fn get_page<T: DeserializeOwned>(&self, path: &str, query: &PageQuery) -> Result<Page<T>, String> {
        let raw: PageOrList<T> = self.get(&endpoints::with_query(path.to_string(), query)).await?;
        Ok(raw.into())
    }

    /// Body-less write, response body ignored.
    pub async fn execute(&self, endpoint: &Endpoint) -> Result<(), String> {
        let request = self.builder(endpoint.method, &endpoint.path).build();
        self.send(endpoint.method, &endpoint.path, request).await?;
        Ok(())
    }

    // ==================== Аутентификация ====================

    pub async fn login(&self, req: &LoginRequest) -> Result<AuthResponse, String> {
        let response: AuthResponse = self.request(Method::Post, &endpoints::login(), Some(req)).await?;
        Self::save_token(&response.token);
        Ok(response)
    }

    pub async fn signup(&self, req: &SignupRequest) -> Result<String, String> {
        let path = endpoints::signup();
        let request = self.builder(Method::Post, &path).json(req);
        let response = self.send(Method::Post, &path, request).await?;
        response
            .text()
            .await
            .map_err(|e| format!("Failed to read response: {}", e))
    }

    pub async fn logout(&self) -> Result<(), String> {
        let result = self.execute(&Endpoint::post(endpoints::logout())).await;
        Self::clear_token();
        result
    }

    pub async fn current_user(&self) -> Result<User, String> {
        self.get(&endpoints::current_user()).await
    }

    // ==================== Топики ====================

    pub async fn list_topics(&self, query: &PageQuery) -> Result<Page<Topic>, String> {
        self.get_page(&endpoints::topics(), query).await
    }

    pub async fn get_topic(&self, id: i64) -> Result<Topic, String> {
        self.get(&endpoints::topic(id)).await
    }

    pub async fn create_topic(&self, req: &CreateTopicRequest) -> Result<Topic, String> {
        self.request(Method::Post, &endpoints::topics(), Some(req)).await
    }

    pub async fn topic_posts(&self, id: i64, query: &PageQuery) -> Result<Page<Post>, String> {
        self.get_page(&endpoints::topic_posts(id), query).await
    }

    // ==================== Посты ====================

    pub async fn get_post(&self, id: i64) -> Result<PostPayload, String> {
        self.get(&endpoints::post(id)).await
    }

    /// Multipart upload: a JSON `post` part and an optional `image` part.
    pub async fn create_post(&self, req: &CreatePostRequest, image: Option<File>) -> Result<Post, String> {
        let form = post_form(req, image.as_ref()).map_err(|e| format!("Failed to build form: {:?}", e))?;
        let path = endpoints::posts();
        let request = self.builder(Method::Post, &path).body(form);
        let response = self.send(Method::Post, &path, request).await?;
        response
            .json()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))
    }

    pub async fn like_post(&self, id: i64) -> Result<(), String> {
        self.execute(&Endpoint::post(endpoints::post_like(id))).await
    }

    pub async fn unlike_post(&self, id: i64) -> Result<(), String> {
        self.execute(&Endpoint::delete(endpoints::post_like(id))).await
    }

    pub async fn bookmark_post(&self, id: i64) -> Result<(), String> {
        self.execute(&Endpoint::post(endpoints::post_bookmark(id))).await
    }

    // ==================== Комментарии ====================

    pub async fn post_comments(&self, post_id: i64) -> Result<Vec<Comment>, String> {
        self.get(&endpoints::post_comments(post_id)).await
    }

    pub async fn create_comment(&self, req: &CreateCommentRequest) -> Result<Comment, String> {
        self.request(Method::Post, &endpoints::comments(), Some(req)).await
    }

    pub async fn comment_replies(&self, comment_id: i64) -> Result<Vec<Comment>, String> {
        self.get(&endpoints::comment_replies(comment_id)).await
    }

    // ==================== Панели управления ====================

    pub async fn dashboard_page<T: DeserializeOwned>(
        &self,
        scope: DashboardScope,
        section: DashboardSection,
        query: &PageQuery,
    ) -> Result<Page<T>, String> {
        let path = scope.list_path(section).map_err(|e| e.to_string())?;
        self.get_page(&path, query).await
    }

    pub async fn admin_stats(&self) -> Result<AdminStats, String> {
        self.get(&endpoints::admin_stats()).await
    }

    pub async fn posts_over_time(&self) -> Result<Vec<DatePoint>, String> {
        self.get(&endpoints::admin_posts_over_time()).await
    }

    pub async fn roles_distribution(&self) -> Result<Vec<RoleCount>, String> {
        self.get(&endpoints::admin_roles_distribution()).await
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

fn post_form(req: &CreatePostRequest, image: Option<&File>) -> Result<FormData, JsValue> {
    let json = serde_json::to_string(req).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let parts = js_sys::Array::of1(&JsValue::from_str(&json));
    let options = BlobPropertyBag::new();
    options.set_type("application/json");
    let post = Blob::new_with_str_sequence_and_options(&parts, &options)?;

    let form = FormData::new()?;
    form.append_with_blob("post", &post)?;
    if let Some(file) = image {
        form.append_with_blob_and_filename("image", file, &file.name())?;
    }
    Ok(form)
}

fn error_message(status: u16, body: &str) -> String {
    if let Some(message) = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(ErrorResponse::into_message)
    {
        return message;
    }
    let body = body.trim();
    if body.is_empty() {
        format!("HTTP {}", status)
    } else {
        format!("HTTP {}: {}", status, body)
    }
}
