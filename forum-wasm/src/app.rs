use crate::api::ApiClient;
use crate::pages::{Dashboard, LoginPage, PostDetail, SignupPage, TopicFeed, TopicList};
use forum_core::models::{Role, User};
use forum_core::DashboardScope;
use wasm_bindgen_futures::spawn_local;
use yew::html::Scope;
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Topics,
    #[at("/topics/:id")]
    Topic { id: i64 },
    #[at("/posts/:id")]
    Post { id: i64 },
    #[at("/login")]
    Login,
    #[at("/signup")]
    Signup,
    #[at("/admin")]
    Admin,
    #[at("/moderation")]
    Moderation,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(route: Route) -> Html {
    match route {
        Route::Topics => html! { <TopicList /> },
        Route::Topic { id } => html! { <TopicFeed {id} /> },
        Route::Post { id } => html! { <PostDetail {id} /> },
        Route::Login => html! { <LoginPage /> },
        Route::Signup => html! { <SignupPage /> },
        Route::Admin => html! { <Dashboard scope={DashboardScope::Admin} /> },
        Route::Moderation => html! { <Dashboard scope={DashboardScope::Moderation} /> },
        Route::NotFound => html! { <h2>{ "Page not found" }</h2> },
    }
}

/// Who is logged in, shared with every page.
#[derive(Clone, PartialEq)]
pub struct Session {
    pub user: Option<User>,
    pub authenticated: bool,
    pub on_change: Callback<()>,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.has_role(Role::Admin))
    }

    pub fn can_moderate(&self) -> bool {
        self.user
            .as_ref()
            .is_some_and(|u| u.has_role(Role::Admin) || u.has_role(Role::Moderator))
    }
}

/// Tells the shell to re-read the token, e.g. after login or a 401.
pub fn sync_session<C: Component>(link: &Scope<C>) {
    if let Some((session, _)) = link.context::<Session>(Callback::noop()) {
        if session.authenticated != ApiClient::is_authenticated() {
            session.on_change.emit(());
        }
    }
}

pub fn notify_auth_change<C: Component>(link: &Scope<C>) {
    if let Some((session, _)) = link.context::<Session>(Callback::noop()) {
        session.on_change.emit(());
    }
}

pub enum Msg {
    Refresh,
    UserLoaded(Result<User, String>),
    Logout,
}

pub struct App {
    user: Option<User>,
    authenticated: bool,
    api: ApiClient,
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        ctx.link().send_message(Msg::Refresh);
        Self {
            user: None,
            authenticated: ApiClient::is_authenticated(),
            api: ApiClient::new(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Refresh => {
                self.authenticated = ApiClient::is_authenticated();
                if !self.authenticated {
                    self.user = None;
                    return true;
                }

                let api = self.api.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    link.send_message(Msg::UserLoaded(api.current_user().await));
                });
                true
            }

            Msg::UserLoaded(Ok(user)) => {
                self.user = Some(user);
                true
            }

            Msg::UserLoaded(Err(e)) => {
                log::error!("Failed to load current user: {}", e);
                self.user = None;
                self.authenticated = ApiClient::is_authenticated();
                true
            }

            Msg::Logout => {
                let api = self.api.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    if let Err(e) = api.logout().await {
                        log::warn!("Logout failed: {}", e);
                    }
                    link.send_message(Msg::Refresh);
                });
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let session = Session {
            user: self.user.clone(),
            authenticated: self.authenticated,
            on_change: ctx.link().callback(|_| Msg::Refresh),
        };

        html! {
            <BrowserRouter>
                <ContextProvider<Session> context={session.clone()}>
                    <div class="container">
                        { self.view_nav(ctx, &session) }
                        <main>
                            <Switch<Route> render={switch} />
                        </main>
                    </div>
                </ContextProvider<Session>>
            </BrowserRouter>
        }
    }
}

impl App {
    fn view_nav(&self, ctx: &Context<Self>, session: &Session) -> Html {
        html! {
            <nav class="navbar">
                <Link<Route> to={Route::Topics}>{ "Forum" }</Link<Route>>
                if session.is_admin() {
                    <Link<Route> to={Route::Admin}>{ "Admin" }</Link<Route>>
                }
                if session.can_moderate() {
                    <Link<Route> to={Route::Moderation}>{ "Moderation" }</Link<Route>>
                }
                <span class="spacer" />
                if session.authenticated {
                    <span class="user-info">
                        { session.user.as_ref().map(|u| u.name.clone()).unwrap_or_else(|| "Logged in".to_string()) }
                    </span>
                    <button onclick={ctx.link().callback(|_| Msg::Logout)}>
                        { "Logout" }
                    </button>
                } else {
                    <Link<Route> to={Route::Login}>{ "Login" }</Link<Route>>
                    <Link<Route> to={Route::Signup}>{ "Sign up" }</Link<Route>>
                }
            </nav>
        }
    }
}
