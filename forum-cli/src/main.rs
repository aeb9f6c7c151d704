mod commands;
mod logging;
mod render;
mod token;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::Session;
use forum_client::{ClientConfig, ForumClient, ForumClientError};
use forum_core::models::{PostSort, Role};
use forum_core::{DashboardScope, DashboardSection, ErrorKind, Mutation};
use std::path::PathBuf;
use token::TokenManager;

#[derive(Parser)]
#[command(name = "forum", author, version, about = "Command-line client for the forum", long_about = None)]
struct Cli {
    /// Server origin, e.g. http://localhost:8080
    #[arg(short, long, env = "FORUM_API_URL")]
    server: Option<String>,

    #[arg(long)]
    token_file: Option<PathBuf>,

    #[arg(long)]
    page_size: Option<u32>,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Signup {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },

    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },

    Logout,

    Status,

    Whoami,

    #[command(subcommand)]
    Topics(TopicCommands),

    #[command(subcommand)]
    Posts(PostCommands),

    Like {
        id: i64,
    },

    Bookmark {
        id: i64,
    },

    #[command(subcommand)]
    Comments(CommentCommands),

    #[command(subcommand)]
    Admin(AdminCommands),

    #[command(subcommand)]
    Moderation(ModerationCommands),
}

#[derive(Subcommand)]
enum TopicCommands {
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        #[arg(short, long)]
        search: Option<String>,
    },

    Show {
        id: i64,

        /// field,direction
        #[arg(long, default_value = "createdAt,desc")]
        sort: PostSort,
    },

    Create {
        #[arg(short, long)]
        name: String,

        #[arg(short, long, default_value = "")]
        description: String,
    },
}

#[derive(Subcommand)]
enum PostCommands {
    List {
        /// Only posts of this topic
        #[arg(short, long)]
        topic: Option<i64>,

        #[arg(short, long, default_value_t = 1)]
        page: u32,

        #[arg(short, long)]
        search: Option<String>,
    },

    Show {
        id: i64,
    },

    Create {
        /// Topic name
        #[arg(long)]
        topic: String,

        #[arg(short, long, default_value = "")]
        title: String,

        #[arg(short, long)]
        content: String,

        #[arg(short, long)]
        image: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum CommentCommands {
    List {
        post_id: i64,
    },

    Add {
        post_id: i64,

        #[arg(short, long)]
        content: String,
    },

    Reply {
        post_id: i64,

        comment_id: i64,

        #[arg(short, long)]
        content: String,
    },

    /// Fetch the replies of one comment
    Replies {
        post_id: i64,

        comment_id: i64,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    List {
        section: DashboardSection,

        #[arg(short, long, default_value_t = 1)]
        page: u32,

        #[arg(short, long)]
        search: Option<String>,
    },

    Delete {
        section: DashboardSection,

        id: i64,
    },

    Ban {
        id: i64,
    },

    Unban {
        id: i64,
    },

    Role {
        id: i64,

        role: Role,
    },

    Stats,
}

#[derive(Subcommand)]
enum ModerationCommands {
    List {
        section: DashboardSection,

        #[arg(short, long, default_value_t = 1)]
        page: u32,

        #[arg(short, long)]
        search: Option<String>,
    },

    Delete {
        section: DashboardSection,

        id: i64,
    },

    Ban {
        id: i64,
    },

    Unban {
        id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env must be loaded before clap reads FORUM_API_URL
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let mut config = ClientConfig::from_env().context("Invalid FORUM_* configuration")?;
    if let Some(server) = cli.server.clone() {
        config = config.with_base_url(server);
    }
    if let Some(page_size) = cli.page_size {
        config = config.with_page_size(page_size);
    }
    let base_url = config.base_url.clone();

    let client = ForumClient::new(config).context("Failed to create forum client")?;
    let tokens = TokenManager::new(cli.token_file.clone())?;
    let token = tokens.load_token()?;
    if let Some(token) = &token {
        client.set_token(token.clone()).await;
        tracing::info!("Authenticated with saved token");
    }

    let session = Session { client, tokens };
    let result = run(&session, cli.command, token.as_deref()).await;

    // the transport drops a token the server rejected with 401
    if token.is_some() && !session.client.is_authenticated().await && session.tokens.clear_token()? {
        println!("🔑 Saved token was rejected and has been removed");
    }

    if let Err(e) = result {
        report(&e, &base_url);
        std::process::exit(1);
    }
    Ok(())
}

async fn run(session: &Session, command: Commands, token: Option<&str>) -> Result<()> {
    match command {
        Commands::Signup {
            name,
            email,
            password,
        } => commands::signup(session, &name, &email, &password).await,

        Commands::Login { email, password } => commands::login(session, &email, &password).await,

        Commands::Logout => commands::logout(session).await,

        Commands::Status => {
            commands::status(session, token);
            Ok(())
        }

        Commands::Whoami => commands::whoami(session).await,

        Commands::Topics(command) => match command {
            TopicCommands::List { page, search } => {
                commands::show_page("Topics", &session.client.topics(), page, search).await
            }
            TopicCommands::Show { id, sort } => commands::show_topic(session, id, &sort).await,
            TopicCommands::Create { name, description } => {
                commands::create_topic(session, &name, &description).await
            }
        },

        Commands::Posts(command) => match command {
            PostCommands::List {
                topic,
                page,
                search,
            } => {
                let driver = match topic {
                    Some(topic_id) => session.client.topic_posts(topic_id),
                    None => session.client.posts(),
                };
                commands::show_page("Posts", &driver, page, search).await
            }
            PostCommands::Show { id } => commands::show_post(session, id).await,
            PostCommands::Create {
                topic,
                title,
                content,
                image,
            } => commands::create_post(session, &topic, &title, &content, image.as_deref()).await,
        },

        Commands::Like { id } => commands::like(session, id).await,

        Commands::Bookmark { id } => commands::bookmark(session, id).await,

        Commands::Comments(command) => match command {
            CommentCommands::List { post_id } => commands::list_comments(session, post_id).await,
            CommentCommands::Add { post_id, content } => {
                commands::add_comment(session, post_id, &content).await
            }
            CommentCommands::Reply {
                post_id,
                comment_id,
                content,
            } => commands::reply(session, post_id, comment_id, &content).await,
            CommentCommands::Replies {
                post_id,
                comment_id,
            } => commands::replies(session, post_id, comment_id).await,
        },

        Commands::Admin(command) => {
            let scope = DashboardScope::Admin;
            match command {
                AdminCommands::List {
                    section,
                    page,
                    search,
                } => commands::dashboard_list(session, scope, section, page, search).await,
                AdminCommands::Delete { section, id } => {
                    commands::dashboard_apply(session, scope, section, Mutation::Delete, id).await
                }
                AdminCommands::Ban { id } => {
                    commands::dashboard_apply(session, scope, DashboardSection::Users, Mutation::Ban, id).await
                }
                AdminCommands::Unban { id } => {
                    commands::dashboard_apply(session, scope, DashboardSection::Users, Mutation::Unban, id).await
                }
                AdminCommands::Role { id, role } => {
                    commands::dashboard_apply(
                        session,
                        scope,
                        DashboardSection::Users,
                        Mutation::ChangeRole(role),
                        id,
                    )
                    .await
                }
                AdminCommands::Stats => commands::stats(session).await,
            }
        }

        Commands::Moderation(command) => {
            let scope = DashboardScope::Moderation;
            match command {
                ModerationCommands::List {
                    section,
                    page,
                    search,
                } => commands::dashboard_list(session, scope, section, page, search).await,
                ModerationCommands::Delete { section, id } => {
                    commands::dashboard_apply(session, scope, section, Mutation::Delete, id).await
                }
                ModerationCommands::Ban { id } => {
                    commands::dashboard_apply(session, scope, DashboardSection::Users, Mutation::Ban, id).await
                }
                ModerationCommands::Unban { id } => {
                    commands::dashboard_apply(session, scope, DashboardSection::Users, Mutation::Unban, id).await
                }
            }
        }
    }
}

fn report(error: &anyhow::Error, base_url: &str) {
    println!("❌ {:#}", error);

    let Some(client_error) = error.downcast_ref::<ForumClientError>() else {
        return;
    };
    match client_error.kind() {
        ErrorKind::Network => println!("   Is the server running at {}?", base_url),
        ErrorKind::Http(401) => {
            println!("   Please login first: forum login --email <email> --password <password>")
        }
        ErrorKind::Http(403) => println!("   Your account does not have the required role"),
        ErrorKind::Http(404) => println!("   Tip: use a 'list' command to see available ids"),
        _ => {}
    }
}
