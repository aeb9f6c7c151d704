use crate::api::ApiClient;
use crate::app::{sync_session, Route};
use crate::widgets::{input_value, media, pager, post_summary, search_box, view_error};
use forum_core::models::{CreatePostRequest, Page, Post, Topic};
use forum_core::{FetchTicket, ListView, ResourceList};
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub id: i64,
}

pub enum Msg {
    TopicLoaded(Result<Topic, String>),
    Fetch,
    Loaded(FetchTicket, Result<Page<Post>, String>),
    Previous,
    Next,
    UpdateSearch(String),
    Search,

    UpdateTitle(String),
    UpdateContent(String),
    CreatePost,
    PostCreated(Result<Post, String>),
}

pub struct TopicFeed {
    topic: Option<Topic>,
    topic_error: Option<String>,
    posts: ResourceList<Post>,
    search_input: String,
    title: String,
    content: String,
    image_input: NodeRef,
    creating: bool,
    form_error: Option<String>,
    api: ApiClient,
}

impl TopicFeed {
    fn load_topic(&self, ctx: &Context<Self>) {
        let id = ctx.props().id;
        let api = self.api.clone();
        let link = ctx.link().clone();
        spawn_local(async move {
            link.send_message(Msg::TopicLoaded(api.get_topic(id).await));
        });
    }

    fn selected_image(&self) -> Option<web_sys::File> {
        self.image_input
            .cast::<HtmlInputElement>()
            .and_then(|input| input.files())
            .and_then(|files| files.get(0))
    }
}

impl Component for TopicFeed {
    type Message = Msg;
    type Properties = Props;

    fn create(ctx: &Context<Self>) -> Self {
        let feed = Self {
            topic: None,
            topic_error: None,
            posts: ResourceList::default(),
            search_input: String::new(),
            title: String::new(),
            content: String::new(),
            image_input: NodeRef::default(),
            creating: false,
            form_error: None,
            api: ApiClient::new(),
        };
        feed.load_topic(ctx);
        ctx.link().send_message(Msg::Fetch);
        feed
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        if ctx.props().id == old_props.id {
            return false;
        }
        self.topic = None;
        self.topic_error = None;
        self.posts.reset();
        self.search_input.clear();
        self.load_topic(ctx);
        ctx.link().send_message(Msg::Fetch);
        true
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::TopicLoaded(Ok(topic)) => {
                if topic.id == ctx.props().id {
                    self.topic = Some(topic);
                }
                true
            }

            Msg::TopicLoaded(Err(e)) => {
                self.topic_error = Some(e);
                true
            }

            Msg::Fetch => {
                let id = ctx.props().id;
                let ticket = self.posts.begin_fetch();
                let api = self.api.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    let result = api.topic_posts(id, ticket.query()).await;
                    link.send_message(Msg::Loaded(ticket, result));
                });
                true
            }

            Msg::Loaded(ticket, result) => {
                let result = result.map_err(|e| format!("Failed to load posts: {}", e));
                if result.is_err() {
                    sync_session(ctx.link());
                }
                let outcome = self.posts.complete(&ticket, result);
                if outcome.needs_refetch() {
                    ctx.link().send_message(Msg::Fetch);
                }
                outcome.applied()
            }

            Msg::Previous => {
                if self.posts.previous_page() {
                    ctx.link().send_message(Msg::Fetch);
                }
                false
            }

            Msg::Next => {
                if self.posts.next_page() {
                    ctx.link().send_message(Msg::Fetch);
                }
                false
            }

            Msg::UpdateSearch(value) => {
                self.search_input = value;
                true
            }

            Msg::Search => {
                if self.posts.set_search(self.search_input.trim()) {
                    ctx.link().send_message(Msg::Fetch);
                }
                false
            }

            Msg::UpdateTitle(value) => {
                self.title = value;
                true
            }

            Msg::UpdateContent(value) => {
                self.content = value;
                true
            }

            Msg::CreatePost => {
                let Some(topic) = &self.topic else {
                    return false;
                };
                if self.content.trim().is_empty() {
                    self.form_error = Some("Post content is required".to_string());
                    return true;
                }
                self.form_error = None;
                self.creating = true;

                let req = CreatePostRequest {
                    title: self.title.trim().to_string(),
                    content: self.content.trim().to_string(),
                    topic_name: topic.name.clone(),
                };
                let image = self.selected_image();
                let api = self.api.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    link.send_message(Msg::PostCreated(api.create_post(&req, image).await));
                });
                true
            }

            Msg::PostCreated(Ok(_)) => {
                self.creating = false;
                self.title.clear();
                self.content.clear();
                if let Some(input) = self.image_input.cast::<HtmlInputElement>() {
                    input.set_value("");
                }
                ctx.link().send_message(Msg::Fetch);
                true
            }

            Msg::PostCreated(Err(e)) => {
                self.creating = false;
                self.form_error = Some(e);
                sync_session(ctx.link());
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        html! {
            <div class="topic-feed">
                { self.view_header() }
                { search_box(&self.search_input, link.callback(Msg::UpdateSearch), link.callback(|_| Msg::Search)) }

                if ApiClient::is_authenticated() && self.topic.is_some() {
                    { self.view_create_form(ctx) }
                }

                { self.view_posts() }
                { pager(&self.posts, link.callback(|_| Msg::Previous), link.callback(|_| Msg::Next)) }
            </div>
        }
    }
}

impl TopicFeed {
    fn view_header(&self) -> Html {
        match (&self.topic, &self.topic_error) {
            (Some(topic), _) => html! {
                <header>
                    <h1>{ &topic.name }</h1>
                    if let Some(description) = &topic.description {
                        <p>{ description }</p>
                    }
                </header>
            },
            (None, Some(error)) => view_error(Some(error.as_str())),
            (None, None) => html! { <h1>{ "Loading topic..." }</h1> },
        }
    }

    fn view_posts(&self) -> Html {
        match self.posts.view() {
            ListView::Loading => html! { <div class="loading">{ "Loading..." }</div> },
            ListView::Error(error) => view_error(Some(error)),
            ListView::Empty => html! { <p>{ "No posts yet. Be the first to create one!" }</p> },
            ListView::Items(posts) => html! {
                <div class="posts-list">
                    { for posts.iter().map(|post| html! {
                        <div class="post" key={post.id}>
                            <Link<Route> to={Route::Post { id: post.id }}>
                                <h3>{ post.display_title() }</h3>
                            </Link<Route>>
                            { media(post) }
                            <p>{ &post.content }</p>
                            <small>{ post_summary(post) }</small>
                        </div>
                    }) }
                </div>
            },
        }
    }

    fn view_create_form(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        html! {
            <div class="create-post">
                <h3>{ "Create New Post" }</h3>
                { view_error(self.form_error.as_deref()) }
                <input
                    type="text"
                    placeholder="Title"
                    value={self.title.clone()}
                    oninput={link.callback(|e: InputEvent| Msg::UpdateTitle(input_value(e)))}
                />
                <textarea
                    placeholder="Content"
                    value={self.content.clone()}
                    oninput={link.callback(|e: InputEvent| {
                        let input: HtmlTextAreaElement = e.target_unchecked_into();
                        Msg::UpdateContent(input.value())
                    })}
                />
                <input type="file" accept="image/*,video/*" ref={self.image_input.clone()} />
                <button disabled={self.creating} onclick={link.callback(|_| Msg::CreatePost)}>
                    { if self.creating { "Posting..." } else { "Create Post" } }
                </button>
            </div>
        }
    }
}
