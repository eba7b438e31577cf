//! Data Transfer Objects
//!
//! Wire representations exchanged with the outside world: the trigger event
//! envelope delivered by the registry, and the request/response bodies of the
//! task-orchestration API. Domain types are derived from these, never the
//! other way around.

pub mod event;
pub mod orchestrator;
