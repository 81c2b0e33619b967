//! Database repositories.

mod attachment;
mod badge;
mod comment;
mod follow;
mod notification;
mod report;
mod user;
mod user_profile;

pub use attachment::AttachmentRepository;
pub use badge::BadgeRepository;
pub use comment::CommentRepository;
pub use follow::FollowRepository;
pub use notification::NotificationRepository;
pub use report::ReportRepository;
pub use user::UserRepository;
pub use user_profile::UserProfileRepository;
