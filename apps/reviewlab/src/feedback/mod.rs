// Review feedback API.
// Submissions are validated, answered via the shared TextOracle, and persisted through ReviewStore.

pub mod handlers;
pub mod prompts;
pub mod service;
pub mod store;
pub mod validation;
