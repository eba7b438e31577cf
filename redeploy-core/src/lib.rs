//! Redeploy Core
//!
//! Core types and pure decision logic for the redeploy workflow.
//!
//! This crate contains:
//! - Domain types: Push events, clusters, tasks and image references
//! - Matching: The repository comparison that decides whether a task is restarted
//! - DTOs: The trigger envelope and the task-orchestration wire format

pub mod domain;
pub mod dto;
