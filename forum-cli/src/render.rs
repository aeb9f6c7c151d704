use chrono::NaiveDateTime;
use colored::Colorize;
use forum_core::models::{Comment, Post, Topic, User};
use forum_core::{ListView, ResourceList};

/// One line of a listing table.
pub trait Row {
    fn row(&self) -> String;
}

impl Row for Topic {
    fn row(&self) -> String {
        format!(
            "[{}] {} ({} posts){}",
            self.id,
            self.name.bold(),
            self.post_count,
            self.description
                .as_deref()
                .map(|d| format!(" - {}", truncate(d, 50)))
                .unwrap_or_default()
        )
    }
}

impl Row for Post {
    fn row(&self) -> String {
        format!(
            "[{}] {} by {} in {} | ♥ {} | 💬 {} | {}",
            self.id,
            self.display_title().bold(),
            self.author_name.as_deref().unwrap_or("anonymous"),
            self.topic_name.as_deref().unwrap_or("-"),
            self.likes_count,
            self.comments_count,
            date(self.created_at.as_ref())
        )
    }
}

impl Row for Comment {
    fn row(&self) -> String {
        format!(
            "[{}] {}: {}",
            self.id,
            self.author_name.as_deref().unwrap_or("anonymous"),
            truncate(&self.content, 60)
        )
    }
}

impl Row for User {
    fn row(&self) -> String {
        let status = if self.banned {
            "banned".red().to_string()
        } else {
            "active".green().to_string()
        };
        format!(
            "[{}] {} <{}> {} {}",
            self.id,
            self.name.bold(),
            self.email,
            self.primary_role(),
            status
        )
    }
}

pub fn print_list<T: Row>(title: &str, list: &ResourceList<T>) {
    match list.view() {
        ListView::Loading => println!("⏳ Loading {}...", title),
        ListView::Error(message) => println!("❌ {}", message),
        ListView::Empty => println!("   No {} found", title),
        ListView::Items(items) => {
            println!("📋 {} ({})", title, list.page_label());
            if !list.search().is_empty() {
                println!("   Search: {:?}", list.search());
            }
            println!();
            for (i, item) in items.iter().enumerate() {
                println!("   {}. {}", i + 1, item.row());
            }
        }
    }
}

pub fn print_post(post: &Post) {
    println!("{}", post.display_title().bold());
    println!(
        "   by {} in {} on {}",
        post.author_name.as_deref().unwrap_or("anonymous"),
        post.topic_name.as_deref().unwrap_or("-"),
        date(post.created_at.as_ref())
    );
    println!(
        "   ♥ {}{} | 💬 {}{}",
        post.likes_count,
        if post.liked { " (liked)" } else { "" },
        post.comments_count,
        if post.bookmarked { " | 🔖 bookmarked" } else { "" }
    );
    if let Some(url) = &post.image_url {
        println!("   Media: {}", url);
    }
    println!();
    println!("{}", post.content);
}

pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}

pub fn date(value: Option<&NaiveDateTime>) -> String {
    value
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("привет мир", 6), "привет...");
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn missing_date_renders_dash() {
        assert_eq!(date(None), "-");
    }
}
