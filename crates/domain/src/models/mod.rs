//! Domain model definitions.

pub mod team;
pub mod todo;
pub mod user;

pub use team::{PendingMember, Team, TeamMembership};
pub use todo::{TeamTodo, Todo};
pub use user::{UserProfile, UserPublic};
