pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod http_client;
pub mod list_driver;
pub mod post_view;

#[cfg(any(test, feature = "test-util"))]
pub mod test_util;
#[cfg(test)]
pub(crate) mod testing;

pub use api::{
    ApiResult, AuthApi, CommentApi, DashboardApi, ForumApi, ImageUpload, Listing, PostApi, TopicApi,
};
pub use config::ClientConfig;
pub use dashboard::{load_overview, AdminOverview, DashboardDriver};
pub use error::ForumClientError;
pub use http_client::HttpClient;
pub use list_driver::ListDriver;
pub use post_view::PostView;

use forum_core::models::{AuthResponse, LoginRequest, Post, SignupRequest, Topic};
use forum_core::{DashboardScope, ValidationError};
use std::sync::Arc;

/// Entry point: one shared HTTP transport plus the screens built on it.
#[derive(Debug, Clone)]
pub struct ForumClient {
    config: ClientConfig,
    http: Arc<HttpClient>,
}

impl ForumClient {
    pub fn new(config: ClientConfig) -> Result<Self, ForumClientError> {
        let config = config.validated()?;
        let http = HttpClient::new(&config)?;
        tracing::debug!("Forum client for {}", config.base_url);
        Ok(Self {
            config,
            http: Arc::new(http),
        })
    }

    pub fn from_env() -> Result<Self, ForumClientError> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The raw API, for calls no screen wraps.
    pub fn api(&self) -> Arc<HttpClient> {
        self.http.clone()
    }

    pub async fn set_token(&self, token: String) {
        self.http.set_token(token).await;
    }

    pub async fn get_token(&self) -> Option<String> {
        self.http.get_token().await
    }

    pub async fn clear_token(&self) {
        self.http.clear_token().await;
    }

    pub async fn is_authenticated(&self) -> bool {
        self.http.is_authenticated().await
    }

    pub async fn login(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<AuthResponse, ForumClientError> {
        let req = LoginRequest {
            email: email.into(),
            password: password.into(),
        };
        if req.email.trim().is_empty() {
            return Err(ValidationError::EmptyField("email").into());
        }
        if req.password.is_empty() {
            return Err(ValidationError::EmptyField("password").into());
        }
        tracing::debug!("Login called for {}", req.email);
        self.http.login(&req).await
    }

    pub async fn signup(
        &self,
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<String, ForumClientError> {
        let req = SignupRequest {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        };
        for (field, value) in [("name", &req.name), ("email", &req.email), ("password", &req.password)] {
            if value.trim().is_empty() {
                return Err(ValidationError::EmptyField(field).into());
            }
        }
        tracing::debug!("Signup called for {}", req.email);
        self.http.signup(&req).await
    }

    pub async fn logout(&self) -> Result<(), ForumClientError> {
        self.http.logout().await
    }

    pub fn topics(&self) -> ListDriver<Topic> {
        ListDriver::topics(self.http.clone(), self.config.page_size)
    }

    /// Feed of all posts in the order the server returns them.
    pub fn posts(&self) -> ListDriver<Post> {
        let api = self.http.clone();
        ListDriver::new("posts", self.config.page_size, move |query| {
            let api = api.clone();
            async move { api.list_posts(&query).await }
        })
    }

    pub fn topic_posts(&self, topic_id: i64) -> ListDriver<Post> {
        ListDriver::topic_posts(self.http.clone(), topic_id, self.config.page_size)
    }

    pub fn post_view(&self, post_id: i64) -> PostView<HttpClient> {
        PostView::new(self.http.clone(), post_id)
    }

    pub fn dashboard<T: Listing>(
        &self,
        scope: DashboardScope,
    ) -> Result<DashboardDriver<HttpClient, T>, ForumClientError> {
        Ok(DashboardDriver::new(
            self.http.clone(),
            scope,
            self.config.page_size,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn blank_credentials_never_reach_the_server() {
        let client = ForumClient::new(ClientConfig::default().with_base_url("http://127.0.0.1:9")).unwrap();

        let err = client.login("", "secret").await.unwrap_err();
        assert!(matches!(
            err,
            ForumClientError::Validation(ValidationError::EmptyField("email"))
        ));

        let err = client.signup("ann", "ann@example.com", " ").await.unwrap_err();
        assert!(matches!(
            err,
            ForumClientError::Validation(ValidationError::EmptyField("password"))
        ));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = ForumClient::new(ClientConfig::default().with_base_url("ftp://forum")).unwrap_err();
        assert!(matches!(err, ForumClientError::InvalidUrl(_)));
    }

    #[test]
    fn moderators_have_no_topic_dashboard() {
        let client = ForumClient::new(ClientConfig::default()).unwrap();
        assert!(client.dashboard::<Topic>(DashboardScope::Moderation).is_err());
        assert!(client.dashboard::<Topic>(DashboardScope::Admin).is_ok());
    }
}
