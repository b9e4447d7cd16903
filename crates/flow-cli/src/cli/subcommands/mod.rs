mod assignee;
mod comment;
mod remote;
mod task;
mod user;

pub use assignee::AssigneeCommands;
pub use comment::CommentCommands;
pub use remote::RemoteCommands;
pub use task::TaskCommands;
pub use user::UserCommands;
