//! Core domain types
//!
//! This module contains the structures the workflow reasons about. They are
//! shared between the orchestrator client (which produces them from wire
//! responses) and the runner (which threads them through workflow contexts).

pub mod cluster;
pub mod event;
pub mod image;
pub mod matcher;
pub mod task;
