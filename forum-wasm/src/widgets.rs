use forum_core::models::{Comment, Post};
use forum_core::ResourceList;
use web_sys::HtmlInputElement;
use yew::prelude::*;

pub fn view_error(error: Option<&str>) -> Html {
    match error {
        Some(error) => html! {
            <div class="error">{ format!("Error: {}", error) }</div>
        },
        None => html! {},
    }
}

pub fn view_flash(message: Option<&str>) -> Html {
    match message {
        Some(message) => html! { <div class="success">{ message }</div> },
        None => html! {},
    }
}

/// Previous / next buttons with the "Page X of Y" label.
pub fn pager<T>(list: &ResourceList<T>, on_previous: Callback<MouseEvent>, on_next: Callback<MouseEvent>) -> Html {
    html! {
        <div class="pagination">
            <button disabled={!list.has_previous() || list.is_loading()} onclick={on_previous}>
                { "Previous" }
            </button>
            <span>{ list.page_label() }</span>
            <button disabled={!list.has_next() || list.is_loading()} onclick={on_next}>
                { "Next" }
            </button>
        </div>
    }
}

pub fn search_box(value: &str, on_input: Callback<String>, on_submit: Callback<()>) -> Html {
    let oninput = on_input.reform(|e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        input.value()
    });
    let onsubmit = on_submit.reform(|e: SubmitEvent| e.prevent_default());

    html! {
        <form class="search" {onsubmit}>
            <input type="search" placeholder="Search..." value={value.to_string()} {oninput} />
            <button type="submit">{ "Search" }</button>
        </form>
    }
}

pub fn input_value(e: InputEvent) -> String {
    let input: HtmlInputElement = e.target_unchecked_into();
    input.value()
}

pub fn author(name: Option<&str>) -> &str {
    name.unwrap_or("anonymous")
}

pub fn post_summary(post: &Post) -> String {
    format!(
        "by {} | ♥ {} | 💬 {}",
        author(post.author_name.as_deref()),
        post.likes_count,
        post.comments_count
    )
}

pub fn media(post: &Post) -> Html {
    let Some(url) = post.image_url.clone() else {
        return html! {};
    };
    let is_video = post
        .media_type
        .as_deref()
        .is_some_and(|t| t.eq_ignore_ascii_case("video") || t.starts_with("video/"));
    if is_video {
        html! { <video class="post-media" src={url} controls={true} /> }
    } else {
        html! { <img class="post-media" src={url} alt="post media" /> }
    }
}

pub fn comment_header(comment: &Comment) -> String {
    let when = comment
        .created_at
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    format!("{} {}", author(comment.author_name.as_deref()), when)
}
