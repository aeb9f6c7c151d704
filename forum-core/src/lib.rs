//! Forum wire models and the view state shared by the native and browser clients.
//!
//! Nothing in here performs I/O: transports hand results to the controllers
//! and read back what to draw.

pub mod comments;
pub mod dashboard;
pub mod endpoints;
pub mod error;
pub mod interaction;
pub mod list;
pub mod models;

pub use comments::{CommentDraft, CommentThread};
pub use dashboard::{DashboardScope, DashboardSection, Mutation};
pub use error::{ErrorKind, ValidationError};
pub use interaction::{InteractionSnapshot, PostInteraction};
pub use list::{Completion, FetchTicket, ListView, PageQuery, ResourceList, DEFAULT_PAGE_SIZE};
