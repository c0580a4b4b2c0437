//! CLI Commands

pub mod config;
pub mod mailbox;
pub mod run;
