use crate::api::ApiClient;
use crate::app::{sync_session, Route};
use crate::widgets::{author, comment_header, media, view_error};
use forum_core::models::{Comment, Post, PostPayload};
use forum_core::{CommentDraft, CommentThread, InteractionSnapshot, PostInteraction};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlTextAreaElement;
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub id: i64,
}

pub enum Msg {
    PostLoaded(Result<PostPayload, String>),
    CommentsLoaded(i64, Result<Vec<Comment>, String>),

    ToggleLike,
    LikeDone(InteractionSnapshot, Result<(), String>),
    ToggleBookmark,
    BookmarkDone(InteractionSnapshot, Result<(), String>),

    UpdateComment(String),
    SubmitComment,
    CommentSubmitted(Result<Comment, String>),

    ToggleReply(i64),
    UpdateReply(String),
    SubmitReply,
    ReplySubmitted(Result<Comment, String>),
    LoadReplies(i64),
    RepliesLoaded(i64, Result<Vec<Comment>, String>),
}

pub struct PostDetail {
    post: Option<Post>,
    error: Option<String>,
    interaction: PostInteraction,
    interaction_pending: bool,
    thread: CommentThread,
    comments_error: Option<String>,
    comment_draft: CommentDraft,
    reply_draft: CommentDraft,
    api: ApiClient,
}

impl PostDetail {
    fn load(&self, ctx: &Context<Self>) {
        let id = ctx.props().id;
        let api = self.api.clone();
        let link = ctx.link().clone();
        spawn_local(async move {
            link.send_message(Msg::PostLoaded(api.get_post(id).await));
        });
    }

    fn load_comments(&self, ctx: &Context<Self>) {
        let id = ctx.props().id;
        let api = self.api.clone();
        let link = ctx.link().clone();
        spawn_local(async move {
            link.send_message(Msg::CommentsLoaded(id, api.post_comments(id).await));
        });
    }

    fn set_comments(&mut self, comments: Vec<Comment>) {
        self.comments_error = None;
        if let Err(e) = self.thread.replace(comments, ApiClient::is_authenticated()) {
            log::warn!("Reply box closed on refresh: {}", e);
        }
    }

    fn submit(&mut self, ctx: &Context<Self>, parent: Option<i64>) -> bool {
        let post_id = ctx.props().id;
        let draft = if parent.is_some() {
            &mut self.reply_draft
        } else {
            &mut self.comment_draft
        };
        let req = match draft.begin_submit(post_id, parent) {
            Ok(req) => req,
            Err(e) => {
                self.comments_error = Some(e.to_string());
                return true;
            }
        };
        self.comments_error = None;

        let api = self.api.clone();
        let link = ctx.link().clone();
        spawn_local(async move {
            let result = api.create_comment(&req).await;
            link.send_message(if parent.is_some() {
                Msg::ReplySubmitted(result)
            } else {
                Msg::CommentSubmitted(result)
            });
        });
        true
    }
}

impl Component for PostDetail {
    type Message = Msg;
    type Properties = Props;

    fn create(ctx: &Context<Self>) -> Self {
        let page = Self {
            post: None,
            error: None,
            interaction: PostInteraction::default(),
            interaction_pending: false,
            thread: CommentThread::default(),
            comments_error: None,
            comment_draft: CommentDraft::new(),
            reply_draft: CommentDraft::new(),
            api: ApiClient::new(),
        };
        page.load(ctx);
        page
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        if ctx.props().id == old_props.id {
            return false;
        }
        self.post = None;
        self.error = None;
        self.thread = CommentThread::default();
        self.load(ctx);
        true
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::PostLoaded(Ok(payload)) => {
                if payload.post().id != ctx.props().id {
                    return false;
                }
                let (post, comments) = payload.into_parts();
                self.interaction = PostInteraction::from_post(&post);
                self.post = Some(post);
                match comments {
                    Some(comments) => self.set_comments(comments),
                    None => self.load_comments(ctx),
                }
                true
            }

            Msg::PostLoaded(Err(e)) => {
                self.error = Some(e);
                sync_session(ctx.link());
                true
            }

            Msg::CommentsLoaded(post_id, _) if post_id != ctx.props().id => false,

            Msg::CommentsLoaded(_, Ok(comments)) => {
                self.set_comments(comments);
                true
            }

            Msg::CommentsLoaded(_, Err(e)) => {
                self.comments_error = Some(format!("Failed to load comments: {}", e));
                true
            }

            Msg::ToggleLike => {
                if !ApiClient::is_authenticated() {
                    self.error = Some("Please login to like posts".to_string());
                    return true;
                }
                if self.interaction_pending {
                    return false;
                }
                let snapshot = self.interaction.toggle_like();
                self.interaction_pending = true;

                let id = ctx.props().id;
                let liked = self.interaction.liked;
                let api = self.api.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    let result = if liked {
                        api.like_post(id).await
                    } else {
                        api.unlike_post(id).await
                    };
                    link.send_message(Msg::LikeDone(snapshot, result));
                });
                true
            }

            Msg::ToggleBookmark => {
                if !ApiClient::is_authenticated() {
                    self.error = Some("Please login to bookmark posts".to_string());
                    return true;
                }
                if self.interaction_pending {
                    return false;
                }
                let snapshot = self.interaction.toggle_bookmark();
                self.interaction_pending = true;

                let id = ctx.props().id;
                let api = self.api.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    link.send_message(Msg::BookmarkDone(snapshot, api.bookmark_post(id).await));
                });
                true
            }

            Msg::LikeDone(snapshot, result) | Msg::BookmarkDone(snapshot, result) => {
                self.interaction_pending = false;
                if let Err(e) = result {
                    log::error!("Interaction failed: {}", e);
                    self.interaction.revert(snapshot);
                    self.error = Some(e);
                    sync_session(ctx.link());
                } else if let Some(post) = self.post.as_mut() {
                    self.interaction.apply_to(post);
                }
                true
            }

            Msg::UpdateComment(value) => {
                self.comment_draft.set_content(value);
                true
            }

            Msg::SubmitComment => self.submit(ctx, None),

            Msg::CommentSubmitted(result) => {
                self.comment_draft.finish_submit(result.is_ok());
                match result {
                    Ok(_) => self.load_comments(ctx),
                    Err(e) => {
                        self.comments_error = Some(e);
                        sync_session(ctx.link());
                    }
                }
                true
            }

            Msg::ToggleReply(id) => {
                if let Err(e) = self.thread.toggle_reply(id, ApiClient::is_authenticated()) {
                    self.comments_error = Some(e.to_string());
                }
                true
            }

            Msg::UpdateReply(value) => {
                self.reply_draft.set_content(value);
                true
            }

            Msg::SubmitReply => match self.thread.replying_to() {
                Some(parent) => self.submit(ctx, Some(parent)),
                None => false,
            },

            Msg::ReplySubmitted(result) => {
                self.reply_draft.finish_submit(result.is_ok());
                match result {
                    Ok(_) => {
                        self.thread.close_reply();
                        self.load_comments(ctx);
                    }
                    Err(e) => {
                        self.comments_error = Some(e);
                        sync_session(ctx.link());
                    }
                }
                true
            }

            Msg::LoadReplies(id) => {
                let api = self.api.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    link.send_message(Msg::RepliesLoaded(id, api.comment_replies(id).await));
                });
                false
            }

            Msg::RepliesLoaded(id, Ok(replies)) => {
                self.thread.attach_replies(id, replies)
            }

            Msg::RepliesLoaded(_, Err(e)) => {
                self.comments_error = Some(e);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let Some(post) = &self.post else {
            return match &self.error {
                Some(error) => view_error(Some(error.as_str())),
                None => html! { <div class="loading">{ "Loading..." }</div> },
            };
        };
        let link = ctx.link();
        let state = self.interaction;

        html! {
            <div class="post-detail">
                { view_error(self.error.as_deref()) }
                <article class="post">
                    <h1>{ post.display_title() }</h1>
                    <small>
                        { format!("by {}", author(post.author_name.as_deref())) }
                        if let Some(topic) = &post.topic_name {
                            { format!(" in {}", topic) }
                        }
                    </small>
                    { media(post) }
                    <p>{ &post.content }</p>
                    <div class="post-actions">
                        <button class={classes!(state.liked.then_some("active"))}
                                disabled={self.interaction_pending}
                                onclick={link.callback(|_| Msg::ToggleLike)}>
                            { format!("{} {}", if state.liked { "♥" } else { "♡" }, state.likes_count) }
                        </button>
                        <button class={classes!(state.bookmarked.then_some("active"))}
                                disabled={self.interaction_pending}
                                onclick={link.callback(|_| Msg::ToggleBookmark)}>
                            { if state.bookmarked { "Bookmarked" } else { "Bookmark" } }
                        </button>
                    </div>
                </article>

                { self.view_comments(ctx) }
            </div>
        }
    }
}

impl PostDetail {
    fn view_comments(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        html! {
            <section class="comments">
                <h2>{ format!("Comments ({})", self.thread.len()) }</h2>
                { view_error(self.comments_error.as_deref()) }

                if ApiClient::is_authenticated() {
                    <div class="comment-form">
                        <textarea
                            placeholder="Write a comment..."
                            value={self.comment_draft.content().to_string()}
                            oninput={link.callback(|e: InputEvent| {
                                let input: HtmlTextAreaElement = e.target_unchecked_into();
                                Msg::UpdateComment(input.value())
                            })}
                        />
                        <button disabled={!self.comment_draft.can_submit()}
                                onclick={link.callback(|_| Msg::SubmitComment)}>
                            { if self.comment_draft.is_submitting() { "Posting..." } else { "Post Comment" } }
                        </button>
                    </div>
                } else {
                    <p>
                        <Link<Route> to={Route::Login}>{ "Login" }</Link<Route>>
                        { " to join the discussion" }
                    </p>
                }

                if self.thread.is_empty() {
                    <p>{ "No comments yet" }</p>
                }
                { for self.thread.roots().iter().map(|c| self.view_comment(c, 0, ctx)) }
            </section>
        }
    }

    fn view_comment(&self, comment: &Comment, depth: usize, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let id = comment.id;
        let replying = self.thread.replying_to() == Some(id);

        html! {
            <div class="comment" key={id} style={format!("margin-left: {}px", depth * 24)}>
                <small>{ comment_header(comment) }</small>
                <p>{ &comment.content }</p>
                <div class="comment-actions">
                    <button onclick={link.callback(move |_| Msg::ToggleReply(id))}>
                        { if replying { "Cancel" } else { "Reply" } }
                    </button>
                    if comment.replies.is_empty() {
                        <button onclick={link.callback(move |_| Msg::LoadReplies(id))}>
                            { "Show replies" }
                        </button>
                    }
                </div>

                if replying {
                    <div class="reply-form">
                        <textarea
                            placeholder="Write a reply..."
                            value={self.reply_draft.content().to_string()}
                            oninput={link.callback(|e: InputEvent| {
                                let input: HtmlTextAreaElement = e.target_unchecked_into();
                                Msg::UpdateReply(input.value())
                            })}
                        />
                        <button disabled={!self.reply_draft.can_submit()}
                                onclick={link.callback(|_| Msg::SubmitReply)}>
                            { if self.reply_draft.is_submitting() { "Posting..." } else { "Post Reply" } }
                        </button>
                    </div>
                }

                { for comment.replies.iter().map(|r| self.view_comment(r, depth + 1, ctx)) }
            </div>
        }
    }
}
