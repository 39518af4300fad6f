// ABOUTME: Attachment store — validates, names, and persists uploaded files under the workspace.
// ABOUTME: Produces collision-free, path-safe references for the message builder.

pub mod naming;
pub mod store;
pub mod types;

pub use naming::*;
pub use store::*;
pub use types::*;
