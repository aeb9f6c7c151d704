use crate::error::ValidationError;
use crate::models::{Comment, CreateCommentRequest};
use std::collections::{BTreeMap, HashSet};

/// Comments of one post with replies embedded under their parents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentThread {
    roots: Vec<Comment>,
    replying_to: Option<i64>,
}

impl CommentThread {
    /// Takes comments that already carry their replies.
    pub fn new(roots: Vec<Comment>) -> Self {
        Self {
            roots,
            replying_to: None,
        }
    }

    /// Nests a flat list by `parent_comment_id`, keeping server order.
    ///
    /// Replies whose parent is not in the list stay top-level.
    pub fn from_flat(comments: Vec<Comment>) -> Self {
        let ids: HashSet<i64> = comments.iter().map(|c| c.id).collect();
        let mut children: BTreeMap<i64, Vec<Comment>> = BTreeMap::new();
        let mut roots = Vec::new();

        for comment in comments {
            match comment.parent_comment_id {
                Some(parent) if parent != comment.id && ids.contains(&parent) => {
                    children.entry(parent).or_default().push(comment)
                }
                _ => roots.push(comment),
            }
        }

        let mut nested: Vec<Comment> = roots
            .into_iter()
            .map(|root| adopt(root, &mut children))
            .collect();

        // parent chains that loop back on themselves never reach a root
        while let Some((_, orphans)) = children.pop_first() {
            for orphan in orphans {
                nested.push(adopt(orphan, &mut children));
            }
        }

        Self::new(nested)
    }

    /// Swaps in a freshly fetched flat list. The open reply box survives when
    /// its comment is still there and the user may still reply.
    pub fn replace(&mut self, comments: Vec<Comment>, authenticated: bool) -> Result<(), ValidationError> {
        let replying_to = self.replying_to;
        *self = Self::from_flat(comments);
        match replying_to {
            Some(id) if self.find(id).is_some() => self.toggle_reply(id, authenticated),
            _ => Ok(()),
        }
    }

    pub fn roots(&self) -> &[Comment] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Number of comments including every nested reply.
    pub fn len(&self) -> usize {
        fn count(comments: &[Comment]) -> usize {
            comments.iter().map(|c| 1 + count(&c.replies)).sum()
        }
        count(&self.roots)
    }

    pub fn find(&self, id: i64) -> Option<&Comment> {
        fn walk(comments: &[Comment], id: i64) -> Option<&Comment> {
            comments
                .iter()
                .find_map(|c| if c.id == id { Some(c) } else { walk(&c.replies, id) })
        }
        walk(&self.roots, id)
    }

    fn find_mut(&mut self, id: i64) -> Option<&mut Comment> {
        fn walk(comments: &mut [Comment], id: i64) -> Option<&mut Comment> {
            for comment in comments.iter_mut() {
                if comment.id == id {
                    return Some(comment);
                }
                if let Some(found) = walk(&mut comment.replies, id) {
                    return Some(found);
                }
            }
            None
        }
        walk(&mut self.roots, id)
    }

    /// Replaces the replies of `parent_id` with a lazily fetched list.
    pub fn attach_replies(&mut self, parent_id: i64, replies: Vec<Comment>) -> bool {
        match self.find_mut(parent_id) {
            Some(parent) => {
                parent.replies = replies;
                true
            }
            None => false,
        }
    }

    /// Opens the reply box under `comment_id`, or closes it when already open.
    pub fn toggle_reply(&mut self, comment_id: i64, authenticated: bool) -> Result<(), ValidationError> {
        if !authenticated {
            return Err(ValidationError::NotAuthenticated);
        }
        self.replying_to = if self.replying_to == Some(comment_id) {
            None
        } else {
            Some(comment_id)
        };
        Ok(())
    }

    pub fn replying_to(&self) -> Option<i64> {
        self.replying_to
    }

    pub fn close_reply(&mut self) {
        self.replying_to = None;
    }

    /// Plain-text rendering, two spaces of indent per nesting level.
    pub fn render_lines(&self) -> Vec<String> {
        fn push(lines: &mut Vec<String>, comments: &[Comment], depth: usize) {
            for comment in comments {
                let author = comment.author_name.as_deref().unwrap_or("anonymous");
                let marker = if depth == 0 { "-" } else { "↳" };
                lines.push(format!(
                    "{}{} [{}] {}: {}",
                    "  ".repeat(depth),
                    marker,
                    comment.id,
                    author,
                    comment.content
                ));
                push(lines, &comment.replies, depth + 1);
            }
        }
        let mut lines = Vec::new();
        push(&mut lines, &self.roots, 0);
        lines
    }
}

fn adopt(mut comment: Comment, children: &mut BTreeMap<i64, Vec<Comment>>) -> Comment {
    if let Some(kids) = children.remove(&comment.id) {
        for kid in kids {
            let kid = adopt(kid, children);
            if !comment.replies.iter().any(|r| r.id == kid.id) {
                comment.replies.push(kid);
            }
        }
    }
    comment
}

/// Text of a comment or reply being written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentDraft {
    content: String,
    submitting: bool,
}

impl CommentDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Whether the submit button is enabled.
    pub fn can_submit(&self) -> bool {
        !self.submitting && !self.content.trim().is_empty()
    }

    /// Builds the request and locks the draft until [`finish_submit`](Self::finish_submit).
    pub fn begin_submit(
        &mut self,
        post_id: i64,
        parent_comment_id: Option<i64>,
    ) -> Result<CreateCommentRequest, ValidationError> {
        if self.submitting {
            return Err(ValidationError::AlreadySubmitting);
        }
        let content = self.content.trim();
        if content.is_empty() {
            return Err(ValidationError::EmptyContent);
        }
        self.submitting = true;
        Ok(CreateCommentRequest {
            content: content.to_string(),
            post_id,
            parent_comment_id,
        })
    }

    /// Unlocks the draft; the text is kept on failure so it can be retried.
    pub fn finish_submit(&mut self, success: bool) {
        self.submitting = false;
        if success {
            self.content.clear();
        }
    }
}
