//! Workflow definitions
//!
//! The two state machines of a redeploy execution:
//! - `fleet`: enumerate clusters, then run the cluster machine once per cluster
//! - `cluster`: decide whether the cluster's first running task must be restarted
//!
//! Both are built once per service and validated at construction.

pub mod cluster;
pub mod fleet;

pub use fleet::fleet_workflow;
