//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod team;
pub mod todo;
pub mod user;

pub use team::{
    MemberWithUserEntity, PendingMemberEntity, PendingWithUserEntity, TeamEntity,
    TeamMembershipEntity, TeamWithOwnershipEntity,
};
pub use todo::{TeamTodoEntity, TodoEntity};
pub use user::{UserEntity, UserProfileEntity};
