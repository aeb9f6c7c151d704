use crate::api::ApiClient;
use crate::app::{notify_auth_change, Route};
use crate::widgets::{input_value, view_error, view_flash};
use forum_core::models::{AuthResponse, LoginRequest, SignupRequest};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

// ==================== Вход ====================

pub enum LoginMsg {
    UpdateEmail(String),
    UpdatePassword(String),
    Login,
    Done(Result<AuthResponse, String>),
}

pub struct LoginPage {
    email: String,
    password: String,
    loading: bool,
    error: Option<String>,
    api: ApiClient,
}

impl Component for LoginPage {
    type Message = LoginMsg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            loading: false,
            error: None,
            api: ApiClient::new(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            LoginMsg::UpdateEmail(val) => {
                self.email = val;
                true
            }

            LoginMsg::UpdatePassword(val) => {
                self.password = val;
                true
            }

            LoginMsg::Login => {
                if self.email.trim().is_empty() || self.password.is_empty() {
                    self.error = Some("Email and password are required".to_string());
                    return true;
                }

                self.loading = true;
                self.error = None;

                let req = LoginRequest {
                    email: self.email.trim().to_string(),
                    password: self.password.clone(),
                };
                let api = self.api.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    link.send_message(LoginMsg::Done(api.login(&req).await));
                });
                true
            }

            LoginMsg::Done(Ok(_)) => {
                self.loading = false;
                self.password.clear();
                notify_auth_change(ctx.link());
                if let Some(navigator) = ctx.link().navigator() {
                    navigator.push(&Route::Topics);
                }
                true
            }

            LoginMsg::Done(Err(e)) => {
                self.loading = false;
                self.error = Some(e);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let onsubmit = link.callback(|e: SubmitEvent| {
            e.prevent_default();
            LoginMsg::Login
        });

        html! {
            <div class="auth-page">
                <h2>{ "Login" }</h2>
                { view_error(self.error.as_deref()) }
                <form {onsubmit}>
                    <input
                        type="email"
                        placeholder="Email"
                        value={self.email.clone()}
                        oninput={link.callback(|e: InputEvent| LoginMsg::UpdateEmail(input_value(e)))}
                    />
                    <input
                        type="password"
                        placeholder="Password"
                        value={self.password.clone()}
                        oninput={link.callback(|e: InputEvent| LoginMsg::UpdatePassword(input_value(e)))}
                    />
                    <button type="submit" disabled={self.loading}>
                        { if self.loading { "Logging in..." } else { "Login" } }
                    </button>
                </form>
                <p>
                    { "No account? " }
                    <Link<Route> to={Route::Signup}>{ "Sign up" }</Link<Route>>
                </p>
            </div>
        }
    }
}

// ==================== Регистрация ====================

pub enum SignupMsg {
    UpdateName(String),
    UpdateEmail(String),
    UpdatePassword(String),
    Signup,
    Done(Result<String, String>),
}

pub struct SignupPage {
    name: String,
    email: String,
    password: String,
    loading: bool,
    error: Option<String>,
    success: Option<String>,
    api: ApiClient,
}

impl Component for SignupPage {
    type Message = SignupMsg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            password: String::new(),
            loading: false,
            error: None,
            success: None,
            api: ApiClient::new(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            SignupMsg::UpdateName(val) => {
                self.name = val;
                true
            }

            SignupMsg::UpdateEmail(val) => {
                self.email = val;
                true
            }

            SignupMsg::UpdatePassword(val) => {
                self.password = val;
                true
            }

            SignupMsg::Signup => {
                if self.name.trim().is_empty()
                    || self.email.trim().is_empty()
                    || self.password.is_empty()
                {
                    self.error = Some("All fields are required".to_string());
                    return true;
                }

                self.loading = true;
                self.error = None;
                self.success = None;

                let req = SignupRequest {
                    name: self.name.trim().to_string(),
                    email: self.email.trim().to_string(),
                    password: self.password.clone(),
                };
                let api = self.api.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    link.send_message(SignupMsg::Done(api.signup(&req).await));
                });
                true
            }

            SignupMsg::Done(Ok(message)) => {
                log::info!("Signup complete: {}", message);
                self.loading = false;
                self.password.clear();
                self.success = Some("Account created, please log in".to_string());
                if let Some(navigator) = ctx.link().navigator() {
                    navigator.push(&Route::Login);
                }
                true
            }

            SignupMsg::Done(Err(e)) => {
                self.loading = false;
                self.error = Some(e);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let onsubmit = link.callback(|e: SubmitEvent| {
            e.prevent_default();
            SignupMsg::Signup
        });

        html! {
            <div class="auth-page">
                <h2>{ "Sign up" }</h2>
                { view_error(self.error.as_deref()) }
                { view_flash(self.success.as_deref()) }
                <form {onsubmit}>
                    <input
                        type="text"
                        placeholder="Name"
                        value={self.name.clone()}
                        oninput={link.callback(|e: InputEvent| SignupMsg::UpdateName(input_value(e)))}
                    />
                    <input
                        type="email"
                        placeholder="Email"
                        value={self.email.clone()}
                        oninput={link.callback(|e: InputEvent| SignupMsg::UpdateEmail(input_value(e)))}
                    />
                    <input
                        type="password"
                        placeholder="Password"
                        value={self.password.clone()}
                        oninput={link.callback(|e: InputEvent| SignupMsg::UpdatePassword(input_value(e)))}
                    />
                    <button type="submit" disabled={self.loading}>
                        { if self.loading { "Creating account..." } else { "Sign up" } }
                    </button>
                </form>
                <p>
                    { "Already registered? " }
                    <Link<Route> to={Route::Login}>{ "Login" }</Link<Route>>
                </p>
            </div>
        }
    }
}
