use crate::models::Post;

/// Like and bookmark state of a single post, updated optimistically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PostInteraction {
    pub liked: bool,
    pub likes_count: u64,
    pub bookmarked: bool,
}

/// Values captured before an optimistic change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionSnapshot(PostInteraction);

impl PostInteraction {
    pub fn from_post(post: &Post) -> Self {
        Self {
            liked: post.liked,
            likes_count: post.likes_count,
            bookmarked: post.bookmarked,
        }
    }

    pub fn toggle_like(&mut self) -> InteractionSnapshot {
        let snapshot = InteractionSnapshot(*self);
        if self.liked {
            self.liked = false;
            self.likes_count = self.likes_count.saturating_sub(1);
        } else {
            self.liked = true;
            self.likes_count += 1;
        }
        snapshot
    }

    pub fn toggle_bookmark(&mut self) -> InteractionSnapshot {
        let snapshot = InteractionSnapshot(*self);
        self.bookmarked = !self.bookmarked;
        snapshot
    }

    pub fn revert(&mut self, snapshot: InteractionSnapshot) {
        *self = snapshot.0;
    }

    pub fn apply_to(&self, post: &mut Post) {
        post.liked = self.liked;
        post.likes_count = self.likes_count;
        post.bookmarked = self.bookmarked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_then_revert_restores_counts() {
        let mut state = PostInteraction {
            liked: false,
            likes_count: 4,
            bookmarked: false,
        };

        let snapshot = state.toggle_like();
        assert!(state.liked);
        assert_eq!(state.likes_count, 5);

        state.revert(snapshot);
        assert!(!state.liked);
        assert_eq!(state.likes_count, 4);
    }

    #[test]
    fn unlike_never_goes_negative() {
        let mut state = PostInteraction {
            liked: true,
            likes_count: 0,
            bookmarked: true,
        };
        state.toggle_like();
        assert_eq!(state.likes_count, 0);
        assert!(!state.liked);

        let snapshot = state.toggle_bookmark();
        assert!(!state.bookmarked);
        state.revert(snapshot);
        assert!(state.bookmarked);
    }
}
