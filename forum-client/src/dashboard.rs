use crate::api::{ApiResult, DashboardApi, Listing};
use crate::list_driver::ListDriver;
use forum_core::models::{AdminStats, DatePoint, RoleCount};
use forum_core::{DashboardScope, Mutation, ValidationError};
use std::sync::Arc;

/// One section table of the admin or moderator dashboard.
pub struct DashboardDriver<A, T> {
    api: Arc<A>,
    scope: DashboardScope,
    list: ListDriver<T>,
}

impl<A: DashboardApi + 'static, T: Listing> DashboardDriver<A, T> {
    pub fn new(api: Arc<A>, scope: DashboardScope, page_size: u32) -> Result<Self, ValidationError> {
        scope.list_path(T::SECTION)?;
        let list = ListDriver::dashboard(api.clone(), scope, page_size);
        Ok(Self { api, scope, list })
    }

    pub fn scope(&self) -> DashboardScope {
        self.scope
    }

    pub fn list(&self) -> &ListDriver<T> {
        &self.list
    }

    pub async fn load(&self) -> bool {
        self.list.refresh().await
    }

    /// Sends the mutation once and reloads the table once it succeeds.
    pub async fn apply(&self, mutation: Mutation, id: i64) -> ApiResult<String> {
        let endpoint = mutation.endpoint(self.scope, T::SECTION, id)?;
        tracing::debug!("{} {} {} from {} dashboard", mutation.label(), T::SECTION, id, self.scope);

        let api = self.api.clone();
        self.list
            .mutate(async move { api.execute(&endpoint).await })
            .await?;

        Ok(mutation.success_message(T::SECTION))
    }
}

/// Header figures of the admin dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminOverview {
    pub stats: AdminStats,
    pub posts_over_time: Vec<DatePoint>,
    pub roles: Vec<RoleCount>,
}

pub async fn load_overview<A: DashboardApi + ?Sized>(api: &A) -> ApiResult<AdminOverview> {
    let (stats, posts_over_time, roles) = futures::try_join!(
        api.admin_stats(),
        api.posts_over_time(),
        api.roles_distribution()
    )?;
    Ok(AdminOverview {
        stats,
        posts_over_time,
        roles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ForumClientError;
    use crate::testing::FakeForum;
    use forum_core::models::{Post, Role, Topic, User};
    use forum_core::DashboardSection;
    use serde_json::json;
    use std::sync::atomic::Ordering;

    fn seeded() -> Arc<FakeForum> {
        let api = FakeForum::new();
        api.sections.lock().unwrap().insert(
            DashboardSection::Posts,
            json!({
                "content": [{ "id": 3, "title": "Spam", "content": "buy now" }],
                "totalPages": 1
            }),
        );
        api.sections.lock().unwrap().insert(
            DashboardSection::Users,
            json!({
                "content": [{ "id": 7, "name": "troll", "email": "t@example.com", "roles": ["USER"] }],
                "totalPages": 1
            }),
        );
        Arc::new(api)
    }

    #[tokio::test]
    async fn delete_issues_one_write_then_one_refetch() {
        let api = seeded();
        let posts = DashboardDriver::<_, Post>::new(api.clone(), DashboardScope::Admin, 10).unwrap();
        posts.load().await;

        let message = posts.apply(Mutation::Delete, 3).await.unwrap();

        assert_eq!(message, "Post deleted successfully");
        assert_eq!(
            api.calls(),
            vec![
                "GET admin/posts page=0",
                "DELETE /api/admin/posts/3",
                "GET admin/posts page=0",
            ]
        );
    }

    #[tokio::test]
    async fn failed_write_does_not_refetch() {
        let api = seeded();
        api.fail_writes.store(true, Ordering::SeqCst);
        let users = DashboardDriver::<_, User>::new(api.clone(), DashboardScope::Moderation, 10).unwrap();
        users.load().await;

        let err = users.apply(Mutation::Ban, 7).await.unwrap_err();

        assert!(matches!(err, ForumClientError::Status { status: 500, .. }));
        assert_eq!(
            api.calls(),
            vec!["GET moderation/users page=0", "POST /api/moderation/users/7/ban"]
        );
        users
            .list()
            .with_state(|list| assert_eq!(list.items().len(), 1))
            .await;
    }

    #[tokio::test]
    async fn unsupported_mutation_sends_nothing() {
        let api = seeded();
        let users = DashboardDriver::<_, User>::new(api.clone(), DashboardScope::Moderation, 10).unwrap();

        let err = users.apply(Mutation::ChangeRole(Role::Admin), 7).await.unwrap_err();

        assert!(matches!(
            err,
            ForumClientError::Validation(ValidationError::Unsupported(_))
        ));
        assert!(api.calls().is_empty());
    }

    #[test]
    fn moderation_has_no_topic_table() {
        let api = seeded();
        assert!(DashboardDriver::<_, Topic>::new(api, DashboardScope::Moderation, 10).is_err());
    }

    #[tokio::test]
    async fn overview_collects_all_three_figures() {
        let api = FakeForum::new();

        let overview = load_overview(&api).await.unwrap();

        assert_eq!(overview.stats.total_users, 3);
        assert_eq!(overview.posts_over_time.len(), 1);
        assert_eq!(overview.roles[0].role, "USER");
        assert_eq!(api.calls().len(), 3);
    }
}
