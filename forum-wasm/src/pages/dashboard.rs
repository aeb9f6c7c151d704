use crate::api::ApiClient;
use crate::app::{sync_session, Session};
use crate::widgets::{author, pager, search_box, view_error, view_flash};
use forum_core::models::{AdminStats, Comment, DatePoint, Page, Post, Role, RoleCount, Topic, User};
use forum_core::{DashboardScope, DashboardSection, FetchTicket, ListView, Mutation, ResourceList};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

const ROLES: [Role; 3] = [Role::User, Role::Moderator, Role::Admin];

#[derive(Properties, PartialEq)]
pub struct Props {
    pub scope: DashboardScope,
}

/// One line of whichever section is selected.
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    Post(Post),
    Comment(Comment),
    Topic(Topic),
    User(User),
}

impl Row {
    pub fn id(&self) -> i64 {
        match self {
            Row::Post(p) => p.id,
            Row::Comment(c) => c.id,
            Row::Topic(t) => t.id,
            Row::User(u) => u.id,
        }
    }
}

type Overview = (AdminStats, Vec<DatePoint>, Vec<RoleCount>);

pub enum Msg {
    SelectSection(DashboardSection),
    Fetch,
    Loaded(FetchTicket, Result<Page<Row>, String>),
    Previous,
    Next,
    UpdateSearch(String),
    Search,

    Apply(Mutation, i64),
    Applied(Result<String, String>),

    OverviewLoaded(Result<Overview, String>),
}

pub struct Dashboard {
    section: DashboardSection,
    rows: ResourceList<Row>,
    search_input: String,
    flash: Option<String>,
    action_error: Option<String>,
    busy: bool,
    overview: Option<Overview>,
    api: ApiClient,
}

async fn fetch_rows(
    api: &ApiClient,
    scope: DashboardScope,
    section: DashboardSection,
    ticket: &FetchTicket,
) -> Result<Page<Row>, String> {
    let query = ticket.query();
    match section {
        DashboardSection::Posts => api
            .dashboard_page::<Post>(scope, section, query)
            .await
            .map(|page| page.map(Row::Post)),
        DashboardSection::Comments => api
            .dashboard_page::<Comment>(scope, section, query)
            .await
            .map(|page| page.map(Row::Comment)),
        DashboardSection::Topics => api
            .dashboard_page::<Topic>(scope, section, query)
            .await
            .map(|page| page.map(Row::Topic)),
        DashboardSection::Users => api
            .dashboard_page::<User>(scope, section, query)
            .await
            .map(|page| page.map(Row::User)),
    }
}

impl Dashboard {
    fn load_overview(&self, ctx: &Context<Self>) {
        if ctx.props().scope != DashboardScope::Admin {
            return;
        }
        let api = self.api.clone();
        let link = ctx.link().clone();
        spawn_local(async move {
            let result = futures::try_join!(
                api.admin_stats(),
                api.posts_over_time(),
                api.roles_distribution()
            );
            link.send_message(Msg::OverviewLoaded(result));
        });
    }

    fn first_section(scope: DashboardScope) -> DashboardSection {
        scope
            .sections()
            .first()
            .copied()
            .unwrap_or(DashboardSection::Posts)
    }
}

impl Component for Dashboard {
    type Message = Msg;
    type Properties = Props;

    fn create(ctx: &Context<Self>) -> Self {
        let dashboard = Self {
            section: Self::first_section(ctx.props().scope),
            rows: ResourceList::default(),
            search_input: String::new(),
            flash: None,
            action_error: None,
            busy: false,
            overview: None,
            api: ApiClient::new(),
        };
        dashboard.load_overview(ctx);
        ctx.link().send_message(Msg::Fetch);
        dashboard
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        if ctx.props().scope == old_props.scope {
            return false;
        }
        self.overview = None;
        self.load_overview(ctx);
        ctx.link()
            .send_message(Msg::SelectSection(Self::first_section(ctx.props().scope)));
        true
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        let scope = ctx.props().scope;
        match msg {
            Msg::SelectSection(section) => {
                if !scope.supports(section) {
                    return false;
                }
                self.section = section;
                self.rows.reset();
                self.search_input.clear();
                self.flash = None;
                self.action_error = None;
                ctx.link().send_message(Msg::Fetch);
                true
            }

            Msg::Fetch => {
                let ticket = self.rows.begin_fetch();
                let section = self.section;
                let api = self.api.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    let result = fetch_rows(&api, scope, section, &ticket).await;
                    link.send_message(Msg::Loaded(ticket, result));
                });
                true
            }

            Msg::Loaded(ticket, result) => {
                let label = self.section.as_str();
                let result = result.map_err(|e| format!("Failed to load {}: {}", label, e));
                if result.is_err() {
                    sync_session(ctx.link());
                }
                let outcome = self.rows.complete(&ticket, result);
                if outcome.needs_refetch() {
                    ctx.link().send_message(Msg::Fetch);
                }
                outcome.applied()
            }

            Msg::Previous => {
                if self.rows.previous_page() {
                    ctx.link().send_message(Msg::Fetch);
                }
                false
            }

            Msg::Next => {
                if self.rows.next_page() {
                    ctx.link().send_message(Msg::Fetch);
                }
                false
            }

            Msg::UpdateSearch(value) => {
                self.search_input = value;
                true
            }

            Msg::Search => {
                if self.rows.set_search(self.search_input.trim()) {
                    ctx.link().send_message(Msg::Fetch);
                }
                false
            }

            Msg::Apply(mutation, id) => {
                if self.busy {
                    return false;
                }
                let endpoint = match mutation.endpoint(scope, self.section, id) {
                    Ok(endpoint) => endpoint,
                    Err(e) => {
                        self.action_error = Some(e.to_string());
                        return true;
                    }
                };
                self.busy = true;
                self.flash = None;
                self.action_error = None;

                let message = mutation.success_message(self.section);
                let api = self.api.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    let result = api.execute(&endpoint).await.map(|_| message);
                    link.send_message(Msg::Applied(result));
                });
                true
            }

            Msg::Applied(Ok(message)) => {
                self.busy = false;
                self.flash = Some(message);
                ctx.link().send_message(Msg::Fetch);
                true
            }

            Msg::Applied(Err(e)) => {
                self.busy = false;
                self.action_error = Some(e);
                sync_session(ctx.link());
                true
            }

            Msg::OverviewLoaded(Ok(overview)) => {
                self.overview = Some(overview);
                true
            }

            Msg::OverviewLoaded(Err(e)) => {
                log::error!("Failed to load admin statistics: {}", e);
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let scope = ctx.props().scope;
        let authenticated = link
            .context::<Session>(Callback::noop())
            .map(|(session, _)| session.authenticated)
            .unwrap_or_else(ApiClient::is_authenticated);

        if !authenticated {
            return html! { <h2>{ "Please login to access this page" }</h2> };
        }

        let title = match scope {
            DashboardScope::Admin => "Admin Dashboard",
            DashboardScope::Moderation => "Moderation",
        };

        html! {
            <div class="dashboard">
                <h1>{ title }</h1>
                { self.view_overview() }

                <div class="tabs">
                    { for scope.sections().iter().map(|&section| {
                        let active = section == self.section;
                        html! {
                            <button class={classes!(active.then_some("active"))}
                                    onclick={link.callback(move |_| Msg::SelectSection(section))}>
                                { section.title() }
                            </button>
                        }
                    }) }
                </div>

                { view_flash(self.flash.as_deref()) }
                { view_error(self.action_error.as_deref()) }
                { search_box(&self.search_input, link.callback(Msg::UpdateSearch), link.callback(|_| Msg::Search)) }
                { self.view_rows(ctx) }
                { pager(&self.rows, link.callback(|_| Msg::Previous), link.callback(|_| Msg::Next)) }
            </div>
        }
    }
}

impl Dashboard {
    fn view_overview(&self) -> Html {
        let Some((stats, posts_over_time, roles)) = &self.overview else {
            return html! {};
        };

        html! {
            <section class="stats">
                <div class="stat-cards">
                    <div class="stat">{ format!("Users: {}", stats.total_users) }</div>
                    <div class="stat">{ format!("Posts: {}", stats.total_posts) }</div>
                    <div class="stat">{ format!("Comments: {}", stats.total_comments) }</div>
                    <div class="stat">{ format!("Topics: {}", stats.total_topics) }</div>
                    <div class="stat">{ format!("Banned: {}", stats.banned_users) }</div>
                </div>
                <div class="stat-lists">
                    <ul>
                        { for posts_over_time.iter().map(|p| html! {
                            <li key={p.date.clone()}>{ format!("{}: {}", p.date, p.count) }</li>
                        }) }
                    </ul>
                    <ul>
                        { for roles.iter().map(|r| html! {
                            <li key={r.role.clone()}>{ format!("{}: {}", r.role, r.count) }</li>
                        }) }
                    </ul>
                </div>
            </section>
        }
    }

    fn view_rows(&self, ctx: &Context<Self>) -> Html {
        match self.rows.view() {
            ListView::Loading => html! { <div class="loading">{ "Loading..." }</div> },
            ListView::Error(error) => view_error(Some(error)),
            ListView::Empty => html! { <p>{ format!("No {} found", self.section.as_str()) }</p> },
            ListView::Items(rows) => html! {
                <table class="dashboard-table">
                    <tbody>
                        { for rows.iter().map(|row| self.view_row(row, ctx)) }
                    </tbody>
                </table>
            },
        }
    }

    fn view_row(&self, row: &Row, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let scope = ctx.props().scope;
        let id = row.id();

        let cells = match row {
            Row::Post(post) => html! {
                <>
                    <td>{ post.display_title() }</td>
                    <td>{ author(post.author_name.as_deref()) }</td>
                    <td>{ format!("♥ {} | 💬 {}", post.likes_count, post.comments_count) }</td>
                </>
            },
            Row::Comment(comment) => html! {
                <>
                    <td>{ &comment.content }</td>
                    <td>{ author(comment.author_name.as_deref()) }</td>
                    <td />
                </>
            },
            Row::Topic(topic) => html! {
                <>
                    <td>{ &topic.name }</td>
                    <td>{ author(topic.creator_name.as_deref()) }</td>
                    <td>{ format!("{} posts", topic.post_count) }</td>
                </>
            },
            Row::User(user) => html! {
                <>
                    <td>{ &user.name }</td>
                    <td>{ &user.email }</td>
                    <td>{ if user.banned { "banned" } else { "active" } }</td>
                </>
            },
        };

        let buttons = row_actions(scope, self.section, row).into_iter().map(|(mutation, label)| {
            html! {
                <button disabled={self.busy} onclick={link.callback(move |_| Msg::Apply(mutation, id))}>
                    { label }
                </button>
            }
        });
        let controls = html! {
            <>
                { for buttons }
                if let (Row::User(user), DashboardScope::Admin) = (row, scope) {
                    { self.view_role_select(user, ctx) }
                }
            </>
        };

        html! {
            <tr key={id}>
                <td>{ id }</td>
                { cells }
                <td class="actions">{ controls }</td>
            </tr>
        }
    }

    fn view_role_select(&self, user: &User, ctx: &Context<Self>) -> Html {
        let id = user.id;
        let current = user.primary_role();
        let onchange = ctx.link().batch_callback(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            match select.value().parse::<Role>() {
                Ok(role) if role != current => Some(Msg::Apply(Mutation::ChangeRole(role), id)),
                _ => None,
            }
        });

        html! {
            <select disabled={self.busy} {onchange}>
                { for ROLES.iter().map(|role| html! {
                    <option value={role.as_str()} selected={*role == current}>{ role.as_str() }</option>
                }) }
            </select>
        }
    }
}

/// Buttons a row offers on this dashboard; role changes use the selector.
fn row_actions(scope: DashboardScope, section: DashboardSection, row: &Row) -> Vec<(Mutation, &'static str)> {
    let candidates: &[(Mutation, &'static str)] = match row {
        Row::User(user) if user.banned => &[(Mutation::Unban, "Unban"), (Mutation::Delete, "Delete")],
        Row::User(_) => &[(Mutation::Ban, "Ban"), (Mutation::Delete, "Delete")],
        _ => &[(Mutation::Delete, "Delete")],
    };
    candidates
        .iter()
        .copied()
        .filter(|(mutation, _)| mutation.endpoint(scope, section, row.id()).is_ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(banned: bool) -> Row {
        Row::User(User {
            id: 7,
            name: "ann".into(),
            email: "ann@example.com".into(),
            roles: vec![Role::User],
            banned,
        })
    }

    fn labels(actions: Vec<(Mutation, &'static str)>) -> Vec<&'static str> {
        actions.into_iter().map(|(_, label)| label).collect()
    }

    #[test]
    fn admins_can_delete_users() {
        let actions = row_actions(DashboardScope::Admin, DashboardSection::Users, &user(false));
        assert_eq!(labels(actions), vec!["Ban", "Delete"]);

        let actions = row_actions(DashboardScope::Admin, DashboardSection::Users, &user(true));
        assert_eq!(labels(actions), vec!["Unban", "Delete"]);
    }

    #[test]
    fn moderators_only_ban_users() {
        let actions = row_actions(DashboardScope::Moderation, DashboardSection::Users, &user(false));
        assert_eq!(labels(actions), vec!["Ban"]);
    }
}
