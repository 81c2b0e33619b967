//! Business logic for the CommunityFix server.
//!
//! Each service owns one domain concern and talks to the database through
//! the repositories in `communityfix-db`:
//!
//! - [`ReportService`]: report lifecycle (create, feed, status, visibility)
//! - [`FollowService`]: report follows and follower counts
//! - [`CommentService`]: comments and their notification fan-out
//! - [`NotificationService`]: per-user notification records
//! - [`BadgeService`]: activity-milestone badge grants
//! - [`UserService`]: accounts, sessions, profiles
//! - [`ModerationService`]: admin visibility and ban controls
//! - [`UploadService`]: report image uploads

pub mod services;

pub use services::*;
