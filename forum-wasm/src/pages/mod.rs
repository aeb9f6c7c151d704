mod auth;
mod dashboard;
mod post_detail;
mod topic_feed;
mod topics;

pub use auth::{LoginPage, SignupPage};
pub use dashboard::Dashboard;
pub use post_detail::PostDetail;
pub use topic_feed::TopicFeed;
pub use topics::TopicList;
