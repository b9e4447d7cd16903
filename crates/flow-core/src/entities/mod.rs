//! Entity structs for Taskflow domain objects.
//!
//! Each entity maps to a table in the libSQL store and to a record shape on the
//! REST backend. All structs derive `Serialize`, `Deserialize` and `JsonSchema`.

mod assignment;
mod audit;
mod comment;
mod task;
mod user;

pub use assignment::Assignment;
pub use audit::AuditEntry;
pub use comment::{Comment, CommentNode};
pub use task::Task;
pub use user::User;
