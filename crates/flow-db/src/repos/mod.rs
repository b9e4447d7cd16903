//! Repository methods on [`FlowService`](crate::service::FlowService), one
//! module per entity.

pub mod assignment;
pub mod audit;
pub mod comment;
pub mod task;
pub mod user;
pub mod view;
