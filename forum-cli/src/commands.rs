use crate::render::{date, print_list, print_post, Row};
use crate::token::{preview, TokenManager};
use anyhow::{bail, Context, Result};
use colored::Colorize;
use forum_client::{
    load_overview, AuthApi, ForumClient, ImageUpload, ListDriver, Listing, PostApi, TopicApi,
};
use forum_core::models::{
    Comment, CreatePostRequest, CreateTopicRequest, Post, PostSort, Role, Topic, User,
};
use forum_core::{DashboardScope, DashboardSection, Mutation};
use std::fs;
use std::path::Path;

pub struct Session {
    pub client: ForumClient,
    pub tokens: TokenManager,
}

// ==================== Аутентификация ====================

pub async fn signup(session: &Session, name: &str, email: &str, password: &str) -> Result<()> {
    println!("📝 Registering user: {}", email);
    let message = session.client.signup(name, email, password).await?;
    println!("✅ {}", message.trim_matches('"'));
    println!("   Now login: forum login --email {} --password <password>", email);
    Ok(())
}

pub async fn login(session: &Session, email: &str, password: &str) -> Result<()> {
    println!("🔑 Logging in as: {}", email);
    let response = session.client.login(email, password).await?;
    session.tokens.save_token(&response.token)?;
    println!("{}", "✅ Login successful!".green());
    println!("   Email: {}", response.email.as_deref().unwrap_or(email));
    println!("   Token saved to {:?}", session.tokens.path());
    Ok(())
}

pub async fn logout(session: &Session) -> Result<()> {
    if !session.client.is_authenticated().await {
        println!("ℹ️  Not logged in");
        return Ok(());
    }
    if let Err(e) = session.client.logout().await {
        println!("⚠️  Server did not confirm logout: {}", e);
    }
    session.tokens.clear_token()?;
    println!("✅ Logged out");
    Ok(())
}

pub fn status(session: &Session, token: Option<&str>) {
    println!("🔌 Server: {}", session.client.config().base_url);
    match token {
        Some(token) => {
            println!("🔑 Token file: {:?}", session.tokens.path());
            println!("   Token: {}", preview(token));
            println!("   Length: {} characters", token.len());
            println!("   Status: ✅ Active");
            println!("\n   To verify token, try: forum whoami");
        }
        None => {
            println!("❌ No token found");
            println!("   Please login first: forum login --email <email> --password <password>");
        }
    }
}

pub async fn whoami(session: &Session) -> Result<()> {
    let api = session.client.api();
    let user = api.current_user().await?;
    println!("👤 {} <{}>", user.name.bold(), user.email);
    println!("   ID: {}", user.id);
    let roles: Vec<&str> = user.roles.iter().map(Role::as_str).collect();
    println!("   Roles: {}", roles.join(", "));
    if user.banned {
        println!("   Status: {}", "banned".red());
    }

    match api.profile().await {
        Ok(profile) => {
            if let Some(joined) = profile.join_date {
                println!("   Joined: {}", joined);
            }
            if let Some(bio) = profile.bio.filter(|b| !b.trim().is_empty()) {
                println!("   Bio: {}", bio);
            }
        }
        Err(e) => tracing::warn!("Profile unavailable: {}", e),
    }
    Ok(())
}

// ==================== Списки ====================

/// Loads the requested 1-based page and prints it.
pub async fn show_page<T: Row + Send + 'static>(
    title: &str,
    driver: &ListDriver<T>,
    page: u32,
    search: Option<String>,
) -> Result<()> {
    let searched = match search {
        Some(term) => driver.set_search(term).await,
        None => false,
    };
    if !searched {
        driver.refresh().await;
    }
    if page > 1 {
        driver.go_to(page - 1).await;
    }

    if let Some(error) = driver.with_state(|list| list.error().map(str::to_string)).await {
        bail!(error);
    }
    driver.with_state(|list| print_list(title, list)).await;
    Ok(())
}

// ==================== Топики ====================

pub async fn show_topic(session: &Session, id: i64, sort: &PostSort) -> Result<()> {
    let details = session.client.api().topic_details(id, sort).await?;
    let topic = &details.topic;
    println!("📂 {}", topic.name.bold());
    if let Some(description) = &topic.description {
        println!("   {}", description);
    }
    println!(
        "   Created by {} on {}",
        topic.creator_name.as_deref().unwrap_or("unknown"),
        date(topic.created_at.as_ref())
    );
    println!();
    println!(
        "📋 Posts sorted by {} (Page {} of {})",
        sort,
        details.posts.number + 1,
        details.posts.total_pages.max(1)
    );
    if details.posts.content.is_empty() {
        println!("   No posts yet");
    }
    for (i, post) in details.posts.content.iter().enumerate() {
        println!("   {}. {}", i + 1, post.row());
    }
    Ok(())
}

pub async fn create_topic(session: &Session, name: &str, description: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Topic name must not be empty");
    }
    let req = CreateTopicRequest {
        name: name.trim().to_string(),
        description: description.trim().to_string(),
    };
    let topic = session.client.api().create_topic(&req).await?;
    println!("✅ Topic created successfully!");
    println!("   {}", topic.row());
    Ok(())
}

// ==================== Посты ====================

pub async fn show_post(session: &Session, id: i64) -> Result<()> {
    let mut view = session.client.post_view(id);
    view.load().await?;
    if let Some(post) = view.post() {
        print_post(post);
    }
    print_thread(view.thread().render_lines());
    Ok(())
}

pub async fn create_post(
    session: &Session,
    topic: &str,
    title: &str,
    content: &str,
    image: Option<&Path>,
) -> Result<()> {
    let req = CreatePostRequest {
        title: title.trim().to_string(),
        content: content.trim().to_string(),
        topic_name: topic.trim().to_string(),
    };
    if req.content.is_empty() {
        bail!("Post content must not be empty");
    }
    if req.topic_name.is_empty() {
        bail!("Topic name must not be empty");
    }

    let upload = match image {
        Some(path) => {
            let bytes = fs::read(path).with_context(|| format!("Failed to read image {:?}", path))?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "upload".to_string());
            Some(ImageUpload::new(file_name, bytes))
        }
        None => None,
    };

    println!("📝 Creating new post in {}...", req.topic_name);
    let post = session.client.api().create_post(&req, upload).await?;
    println!("✅ Post created successfully!");
    println!("   {}", post.row());
    Ok(())
}

pub async fn like(session: &Session, id: i64) -> Result<()> {
    let mut view = session.client.post_view(id);
    view.load().await?;
    view.toggle_like().await?;
    let state = view.interaction();
    if state.liked {
        println!("♥ Liked post #{} ({} likes)", id, state.likes_count);
    } else {
        println!("♡ Removed like from post #{} ({} likes)", id, state.likes_count);
    }
    Ok(())
}

pub async fn bookmark(session: &Session, id: i64) -> Result<()> {
    let mut view = session.client.post_view(id);
    view.load().await?;
    view.toggle_bookmark().await?;
    if view.interaction().bookmarked {
        println!("🔖 Bookmarked post #{}", id);
    } else {
        println!("🔖 Removed bookmark from post #{}", id);
    }
    Ok(())
}

// ==================== Комментарии ====================

fn print_thread(lines: Vec<String>) {
    println!();
    if lines.is_empty() {
        println!("💬 No comments yet");
        return;
    }
    println!("💬 Comments");
    for line in lines {
        println!("   {}", line);
    }
}

pub async fn list_comments(session: &Session, post_id: i64) -> Result<()> {
    let mut view = session.client.post_view(post_id);
    view.refresh_comments().await?;
    println!("💬 {} comments on post #{}", view.thread().len(), post_id);
    print_thread(view.thread().render_lines());
    Ok(())
}

pub async fn add_comment(session: &Session, post_id: i64, content: &str) -> Result<()> {
    let mut view = session.client.post_view(post_id);
    view.comment_draft_mut().set_content(content);
    let created = view.submit_comment().await?;
    println!("✅ Comment #{} added", created.id);
    print_thread(view.thread().render_lines());
    Ok(())
}

pub async fn reply(session: &Session, post_id: i64, comment_id: i64, content: &str) -> Result<()> {
    let mut view = session.client.post_view(post_id);
    view.refresh_comments().await?;
    if view.thread().find(comment_id).is_none() {
        bail!("Comment #{} not found on post #{}", comment_id, post_id);
    }
    view.toggle_reply(comment_id).await?;
    view.reply_draft_mut().set_content(content);
    let created = view.submit_reply().await?;
    println!("✅ Reply #{} added under comment #{}", created.id, comment_id);
    print_thread(view.thread().render_lines());
    Ok(())
}

pub async fn replies(session: &Session, post_id: i64, comment_id: i64) -> Result<()> {
    let mut view = session.client.post_view(post_id);
    view.refresh_comments().await?;
    if view.thread().find(comment_id).is_none() {
        bail!("Comment #{} not found on post #{}", comment_id, post_id);
    }
    let count = view.load_replies(comment_id).await?;
    println!("💬 {} replies to comment #{}", count, comment_id);
    print_thread(view.thread().render_lines());
    Ok(())
}

// ==================== Панели управления ====================

async fn section_page<T: Listing + Row>(
    session: &Session,
    scope: DashboardScope,
    page: u32,
    search: Option<String>,
) -> Result<()> {
    let dashboard = session.client.dashboard::<T>(scope)?;
    show_page(T::SECTION.title(), dashboard.list(), page, search).await
}

pub async fn dashboard_list(
    session: &Session,
    scope: DashboardScope,
    section: DashboardSection,
    page: u32,
    search: Option<String>,
) -> Result<()> {
    match section {
        DashboardSection::Posts => section_page::<Post>(session, scope, page, search).await,
        DashboardSection::Comments => section_page::<Comment>(session, scope, page, search).await,
        DashboardSection::Topics => section_page::<Topic>(session, scope, page, search).await,
        DashboardSection::Users => section_page::<User>(session, scope, page, search).await,
    }
}

async fn section_apply<T: Listing + Row>(
    session: &Session,
    scope: DashboardScope,
    mutation: Mutation,
    id: i64,
) -> Result<()> {
    let dashboard = session.client.dashboard::<T>(scope)?;
    let message = dashboard.apply(mutation, id).await?;
    println!("{}", format!("✅ {}", message).green());
    dashboard
        .list()
        .with_state(|list| print_list(T::SECTION.title(), list))
        .await;
    Ok(())
}

pub async fn dashboard_apply(
    session: &Session,
    scope: DashboardScope,
    section: DashboardSection,
    mutation: Mutation,
    id: i64,
) -> Result<()> {
    match section {
        DashboardSection::Posts => section_apply::<Post>(session, scope, mutation, id).await,
        DashboardSection::Comments => section_apply::<Comment>(session, scope, mutation, id).await,
        DashboardSection::Topics => section_apply::<Topic>(session, scope, mutation, id).await,
        DashboardSection::Users => section_apply::<User>(session, scope, mutation, id).await,
    }
}

pub async fn stats(session: &Session) -> Result<()> {
    let api = session.client.api();
    let overview = load_overview(api.as_ref()).await?;
    let stats = &overview.stats;
    println!("📊 Forum statistics");
    println!("   Users:    {} ({} banned)", stats.total_users, stats.banned_users);
    println!("   Topics:   {}", stats.total_topics);
    println!("   Posts:    {}", stats.total_posts);
    println!("   Comments: {}", stats.total_comments);

    if !overview.posts_over_time.is_empty() {
        println!();
        println!("📈 Posts over time");
        for point in &overview.posts_over_time {
            println!("   {}  {}", point.date, point.count);
        }
    }
    if !overview.roles.is_empty() {
        println!();
        println!("👥 Roles");
        for role in &overview.roles {
            println!("   {:<10} {}", role.role, role.count);
        }
    }
    Ok(())
}
