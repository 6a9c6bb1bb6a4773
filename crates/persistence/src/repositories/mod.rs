//! Repository implementations for database operations.

pub mod membership;
pub mod team;
pub mod todo;
pub mod user;

pub use membership::{MembershipRepository, ResolvedTarget, TargetKind};
pub use team::TeamRepository;
pub use todo::TodoRepository;
pub use user::UserRepository;
