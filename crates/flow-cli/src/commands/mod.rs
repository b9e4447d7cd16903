pub mod assignee;
pub mod audit;
pub mod comment;
pub mod dispatch;
pub mod remote;
pub mod shared;
pub mod status;
pub mod task;
pub mod user;
pub mod view;
