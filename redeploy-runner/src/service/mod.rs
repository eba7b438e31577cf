//! Service layer
//!
//! Services hold the runner's business logic. The redeploy service turns an
//! accepted push event into one workflow execution and reports its outcome.
//!
//! Services are trait-based so the entry point can be driven by fakes.

mod redeploy;

pub use redeploy::RedeployService;
pub use redeploy::StandardRedeployService;
