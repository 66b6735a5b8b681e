//! Business logic for the absence / cover / duty scheduling engine.
//!
//! Each module wraps one or more `db` repositories behind an API expressed
//! in domain terms; callers (the `api` crate, or tests) never touch
//! `sea_orm` directly.

pub mod attachments;
pub mod cover_engine;
pub mod directory;
pub mod drive_archiver;
pub mod duty_scheduler;
pub mod error;
pub mod leave_manager;
pub mod notifier;
pub mod schedule;
pub mod webhooks;
