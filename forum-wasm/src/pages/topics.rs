use crate::api::ApiClient;
use crate::app::{sync_session, Route};
use crate::widgets::{input_value, pager, search_box, view_error};
use forum_core::models::{CreateTopicRequest, Page, Topic};
use forum_core::{FetchTicket, ListView, ResourceList};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

pub enum Msg {
    Fetch,
    Loaded(FetchTicket, Result<Page<Topic>, String>),
    Previous,
    Next,
    UpdateSearch(String),
    Search,

    UpdateName(String),
    UpdateDescription(String),
    CreateTopic,
    TopicCreated(Result<Topic, String>),
}

pub struct TopicList {
    topics: ResourceList<Topic>,
    search_input: String,
    name: String,
    description: String,
    form_error: Option<String>,
    api: ApiClient,
}

impl Component for TopicList {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        ctx.link().send_message(Msg::Fetch);
        Self {
            topics: ResourceList::default(),
            search_input: String::new(),
            name: String::new(),
            description: String::new(),
            form_error: None,
            api: ApiClient::new(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Fetch => {
                let ticket = self.topics.begin_fetch();
                let api = self.api.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    let result = api.list_topics(ticket.query()).await;
                    link.send_message(Msg::Loaded(ticket, result));
                });
                true
            }

            Msg::Loaded(ticket, result) => {
                let result = result.map_err(|e| format!("Failed to load topics: {}", e));
                if result.is_err() {
                    sync_session(ctx.link());
                }
                let outcome = self.topics.complete(&ticket, result);
                if outcome.needs_refetch() {
                    ctx.link().send_message(Msg::Fetch);
                }
                outcome.applied()
            }

            Msg::Previous => {
                if self.topics.previous_page() {
                    ctx.link().send_message(Msg::Fetch);
                }
                false
            }

            Msg::Next => {
                if self.topics.next_page() {
                    ctx.link().send_message(Msg::Fetch);
                }
                false
            }

            Msg::UpdateSearch(value) => {
                self.search_input = value;
                true
            }

            Msg::Search => {
                if self.topics.set_search(self.search_input.trim()) {
                    ctx.link().send_message(Msg::Fetch);
                }
                false
            }

            Msg::UpdateName(value) => {
                self.name = value;
                true
            }

            Msg::UpdateDescription(value) => {
                self.description = value;
                true
            }

            Msg::CreateTopic => {
                if self.name.trim().is_empty() {
                    self.form_error = Some("Topic name is required".to_string());
                    return true;
                }
                self.form_error = None;

                let req = CreateTopicRequest {
                    name: self.name.trim().to_string(),
                    description: self.description.trim().to_string(),
                };
                let api = self.api.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    link.send_message(Msg::TopicCreated(api.create_topic(&req).await));
                });
                false
            }

            Msg::TopicCreated(Ok(topic)) => {
                log::info!("Topic {} created", topic.id);
                self.name.clear();
                self.description.clear();
                ctx.link().send_message(Msg::Fetch);
                true
            }

            Msg::TopicCreated(Err(e)) => {
                self.form_error = Some(e);
                sync_session(ctx.link());
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        html! {
            <div class="topics-page">
                <h1>{ "Topics" }</h1>
                { search_box(&self.search_input, link.callback(Msg::UpdateSearch), link.callback(|_| Msg::Search)) }

                if ApiClient::is_authenticated() {
                    { self.view_create_form(ctx) }
                }

                { self.view_topics() }
                { pager(&self.topics, link.callback(|_| Msg::Previous), link.callback(|_| Msg::Next)) }
            </div>
        }
    }
}

impl TopicList {
    fn view_topics(&self) -> Html {
        match self.topics.view() {
            ListView::Loading => html! { <div class="loading">{ "Loading..." }</div> },
            ListView::Error(error) => view_error(Some(error)),
            ListView::Empty => html! { <p>{ "No topics found" }</p> },
            ListView::Items(topics) => html! {
                <ul class="topic-list">
                    { for topics.iter().map(|topic| html! {
                        <li class="topic" key={topic.id}>
                            <Link<Route> to={Route::Topic { id: topic.id }}>
                                <h3>{ &topic.name }</h3>
                            </Link<Route>>
                            if let Some(description) = &topic.description {
                                <p>{ description }</p>
                            }
                            <small>
                                { format!("{} posts", topic.post_count) }
                                if let Some(creator) = &topic.creator_name {
                                    { format!(" | created by {}", creator) }
                                }
                            </small>
                        </li>
                    }) }
                </ul>
            },
        }
    }

    fn view_create_form(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        html! {
            <div class="create-topic">
                <h3>{ "New Topic" }</h3>
                { view_error(self.form_error.as_deref()) }
                <input
                    type="text"
                    placeholder="Name"
                    value={self.name.clone()}
                    oninput={link.callback(|e: InputEvent| Msg::UpdateName(input_value(e)))}
                />
                <input
                    type="text"
                    placeholder="Description"
                    value={self.description.clone()}
                    oninput={link.callback(|e: InputEvent| Msg::UpdateDescription(input_value(e)))}
                />
                <button onclick={link.callback(|_| Msg::CreateTopic)}>{ "Create Topic" }</button>
            </div>
        }
    }
}
