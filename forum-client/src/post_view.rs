use crate::api::{ApiResult, AuthApi, CommentApi, PostApi};
use forum_core::models::{Comment, Post};
use forum_core::{CommentDraft, CommentThread, PostInteraction, ValidationError};
use std::sync::Arc;

/// Post detail screen: the post, its interaction buttons and its comment thread.
pub struct PostView<A> {
    api: Arc<A>,
    post_id: i64,
    post: Option<Post>,
    interaction: PostInteraction,
    thread: CommentThread,
    comment_draft: CommentDraft,
    reply_draft: CommentDraft,
}

impl<A: AuthApi + PostApi + CommentApi> PostView<A> {
    pub fn new(api: Arc<A>, post_id: i64) -> Self {
        Self {
            api,
            post_id,
            post: None,
            interaction: PostInteraction::default(),
            thread: CommentThread::default(),
            comment_draft: CommentDraft::new(),
            reply_draft: CommentDraft::new(),
        }
    }

    pub fn post(&self) -> Option<&Post> {
        self.post.as_ref()
    }

    pub fn interaction(&self) -> PostInteraction {
        self.interaction
    }

    pub fn thread(&self) -> &CommentThread {
        &self.thread
    }

    pub fn comment_draft_mut(&mut self) -> &mut CommentDraft {
        &mut self.comment_draft
    }

    pub fn reply_draft_mut(&mut self) -> &mut CommentDraft {
        &mut self.reply_draft
    }

    /// Loads the post, then its comments unless they came bundled with it.
    pub async fn load(&mut self) -> ApiResult<()> {
        let (post, comments) = self.api.get_post(self.post_id).await?.into_parts();
        self.interaction = PostInteraction::from_post(&post);
        self.post = Some(post);
        match comments {
            Some(comments) => self.rebuild_thread(comments).await,
            None => self.refresh_comments().await,
        }
    }

    pub async fn refresh_comments(&mut self) -> ApiResult<()> {
        let comments = self.api.post_comments(self.post_id).await?;
        self.rebuild_thread(comments).await
    }

    async fn rebuild_thread(&mut self, comments: Vec<Comment>) -> ApiResult<()> {
        let authenticated = self.api.is_authenticated().await;
        self.thread.replace(comments, authenticated)?;
        Ok(())
    }

    async fn require_auth(&self) -> ApiResult<()> {
        if self.api.is_authenticated().await {
            Ok(())
        } else {
            Err(ValidationError::NotAuthenticated.into())
        }
    }

    fn sync_post(&mut self) {
        if let Some(post) = self.post.as_mut() {
            self.interaction.apply_to(post);
        }
    }

    /// Flips the like state at once and puts it back if the server refuses.
    pub async fn toggle_like(&mut self) -> ApiResult<()> {
        self.require_auth().await?;
        let snapshot = self.interaction.toggle_like();
        self.sync_post();

        let result = if self.interaction.liked {
            self.api.like_post(self.post_id).await
        } else {
            self.api.unlike_post(self.post_id).await
        };

        if let Err(e) = result {
            tracing::error!("Like toggle on post {} failed: {}", self.post_id, e);
            self.interaction.revert(snapshot);
            self.sync_post();
            return Err(e);
        }
        Ok(())
    }

    pub async fn toggle_bookmark(&mut self) -> ApiResult<()> {
        self.require_auth().await?;
        let snapshot = self.interaction.toggle_bookmark();
        self.sync_post();

        if let Err(e) = self.api.bookmark_post(self.post_id).await {
            tracing::error!("Bookmark toggle on post {} failed: {}", self.post_id, e);
            self.interaction.revert(snapshot);
            self.sync_post();
            return Err(e);
        }
        Ok(())
    }

    pub async fn toggle_reply(&mut self, comment_id: i64) -> ApiResult<()> {
        let authenticated = self.api.is_authenticated().await;
        self.thread.toggle_reply(comment_id, authenticated)?;
        Ok(())
    }

    /// Posts the top-level draft and reloads the thread.
    pub async fn submit_comment(&mut self) -> ApiResult<Comment> {
        self.require_auth().await?;
        let request = self.comment_draft.begin_submit(self.post_id, None)?;

        let result = self.api.create_comment(&request).await;
        self.comment_draft.finish_submit(result.is_ok());
        let created = result?;

        self.refresh_comments().await?;
        Ok(created)
    }

    /// Posts the reply draft under the comment whose reply box is open.
    pub async fn submit_reply(&mut self) -> ApiResult<Comment> {
        self.require_auth().await?;
        let parent = self
            .thread
            .replying_to()
            .ok_or(ValidationError::EmptyField("reply target"))?;
        let request = self.reply_draft.begin_submit(self.post_id, Some(parent))?;

        let result = self.api.create_comment(&request).await;
        self.reply_draft.finish_submit(result.is_ok());
        let created = result?;

        self.thread.close_reply();
        self.refresh_comments().await?;
        Ok(created)
    }

    /// Fetches the replies of one comment and nests them under it.
    pub async fn load_replies(&mut self, comment_id: i64) -> ApiResult<usize> {
        let replies = self.api.comment_replies(comment_id).await?;
        let count = replies.len();
        self.thread.attach_replies(comment_id, replies);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ForumClientError;
    use crate::testing::{comment, post, FakeForum};
    use std::sync::atomic::Ordering;

    fn forum(likes: u64, liked: bool, authenticated: bool) -> Arc<FakeForum> {
        let api = FakeForum::new();
        *api.post.lock().unwrap() = Some(post(5, likes, liked));
        *api.comments.lock().unwrap() = vec![comment(1, None), comment(2, Some(1))];
        api.authenticated.store(authenticated, Ordering::SeqCst);
        Arc::new(api)
    }

    #[tokio::test]
    async fn load_fetches_post_before_comments_and_nests_replies() {
        let api = forum(0, false, false);
        let mut view = PostView::new(api.clone(), 5);

        view.load().await.unwrap();

        assert_eq!(api.calls(), vec!["GET post 5", "GET comments 5"]);
        assert_eq!(view.thread().roots().len(), 1);
        assert_eq!(view.thread().roots()[0].replies[0].id, 2);
    }

    #[tokio::test]
    async fn bundled_comments_skip_the_comments_request() {
        let api = forum(3, false, false);
        api.embed_comments.store(true, Ordering::SeqCst);
        let mut view = PostView::new(api.clone(), 5);

        view.load().await.unwrap();

        assert_eq!(api.calls(), vec!["GET post 5"]);
        assert_eq!(view.post().unwrap().likes_count, 3);
        assert_eq!(view.thread().len(), 2);
        assert_eq!(view.thread().roots()[0].replies[0].id, 2);
    }

    #[tokio::test]
    async fn like_is_optimistic() {
        let api = forum(4, false, true);
        let mut view = PostView::new(api.clone(), 5);
        view.load().await.unwrap();

        view.toggle_like().await.unwrap();

        assert!(view.interaction().liked);
        assert_eq!(view.post().unwrap().likes_count, 5);
        assert_eq!(api.calls().last().unwrap(), "POST like 5");
    }

    #[tokio::test]
    async fn failed_unlike_restores_previous_state() {
        let api = forum(4, true, true);
        let mut view = PostView::new(api.clone(), 5);
        view.load().await.unwrap();
        api.fail_writes.store(true, Ordering::SeqCst);

        let err = view.toggle_like().await.unwrap_err();

        assert!(matches!(err, ForumClientError::Status { status: 500, .. }));
        assert_eq!(api.calls().last().unwrap(), "DELETE like 5");
        assert!(view.interaction().liked);
        assert_eq!(view.interaction().likes_count, 4);
        assert_eq!(view.post().unwrap().likes_count, 4);
    }

    #[tokio::test]
    async fn failed_bookmark_reverts() {
        let api = forum(0, false, true);
        let mut view = PostView::new(api.clone(), 5);
        view.load().await.unwrap();
        api.fail_writes.store(true, Ordering::SeqCst);

        assert!(view.toggle_bookmark().await.is_err());
        assert!(!view.interaction().bookmarked);
    }

    #[tokio::test]
    async fn guests_cannot_like() {
        let api = forum(0, false, false);
        let mut view = PostView::new(api.clone(), 5);
        view.load().await.unwrap();
        let before = api.calls().len();

        let err = view.toggle_like().await.unwrap_err();

        assert!(matches!(
            err,
            ForumClientError::Validation(ValidationError::NotAuthenticated)
        ));
        assert_eq!(api.calls().len(), before);
        assert!(!view.interaction().liked);
    }

    #[tokio::test]
    async fn lost_session_is_noticed_after_the_view_was_built() {
        let api = forum(0, false, true);
        let mut view = PostView::new(api.clone(), 5);
        view.load().await.unwrap();
        view.toggle_reply(1).await.unwrap();
        view.comment_draft_mut().set_content("hello");

        // a 401 elsewhere drops the token
        api.authenticated.store(false, Ordering::SeqCst);
        let before = api.calls().len();

        for err in [
            view.toggle_like().await.unwrap_err(),
            view.submit_comment().await.unwrap_err(),
            view.toggle_reply(2).await.unwrap_err(),
        ] {
            assert!(matches!(
                err,
                ForumClientError::Validation(ValidationError::NotAuthenticated)
            ));
        }
        assert_eq!(api.calls().len(), before);
        assert!(!view.interaction().liked);
        assert_eq!(view.comment_draft_mut().content(), "hello");
    }

    #[tokio::test]
    async fn blank_comment_sends_nothing() {
        let api = forum(0, false, true);
        let mut view = PostView::new(api.clone(), 5);
        view.comment_draft_mut().set_content("   ");

        let err = view.submit_comment().await.unwrap_err();

        assert!(matches!(
            err,
            ForumClientError::Validation(ValidationError::EmptyContent)
        ));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn reply_goes_under_open_comment_and_closes_box() {
        let api = forum(0, false, true);
        let mut view = PostView::new(api.clone(), 5);
        view.load().await.unwrap();
        view.toggle_reply(1).await.unwrap();
        view.reply_draft_mut().set_content(" thanks ");

        let created = view.submit_reply().await.unwrap();

        assert_eq!(created.parent_comment_id, Some(1));
        assert_eq!(created.content, "thanks");
        assert_eq!(view.thread().replying_to(), None);
        assert_eq!(view.thread().len(), 3);
        assert!(view.reply_draft_mut().content().is_empty());
        assert_eq!(
            api.calls()[2..],
            [
                "POST comment post=5 parent=Some(1) thanks".to_string(),
                "GET comments 5".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn failed_comment_keeps_draft() {
        let api = forum(0, false, true);
        api.fail_writes.store(true, Ordering::SeqCst);
        let mut view = PostView::new(api.clone(), 5);
        view.comment_draft_mut().set_content("first!");

        assert!(view.submit_comment().await.is_err());
        assert_eq!(view.comment_draft_mut().content(), "first!");
        assert!(!view.comment_draft_mut().is_submitting());
    }

    #[tokio::test]
    async fn lazily_loaded_replies_attach_to_parent() {
        let api = forum(0, false, false);
        api.replies
            .lock()
            .unwrap()
            .insert(2, vec![comment(9, Some(2))]);
        let mut view = PostView::new(api.clone(), 5);
        view.load().await.unwrap();

        assert_eq!(view.load_replies(2).await.unwrap(), 1);
        assert!(view.thread().find(9).is_some());
    }
}
