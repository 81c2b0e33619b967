//! Business logic services.

#![allow(missing_docs)]

pub mod badge;
pub mod comment;
pub mod follow;
pub mod moderation;
pub mod notification;
pub mod report;
pub mod upload;
pub mod user;

pub use badge::BadgeService;
pub use comment::{CommentService, CreateCommentInput};
pub use follow::FollowService;
pub use moderation::ModerationService;
pub use notification::NotificationService;
pub use report::{CreateReportInput, ReportService};
pub use upload::{CreateUploadInput, StorageService, UploadService};
pub use user::{CreateUserInput, UpdateUserInput, UserService};
