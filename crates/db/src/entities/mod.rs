//! Database entities.

pub mod attachment;
pub mod badge;
pub mod comment;
pub mod follow;
pub mod notification;
pub mod report;
pub mod user;
pub mod user_profile;

pub use attachment::Entity as Attachment;
pub use badge::Entity as Badge;
pub use comment::Entity as Comment;
pub use follow::Entity as Follow;
pub use notification::Entity as Notification;
pub use report::Entity as Report;
pub use user::Entity as User;
pub use user_profile::Entity as UserProfile;
