//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

pub(crate) mod entities;
mod member_repository;

pub use member_repository::{MemberRepository, MemberStore};

#[cfg(test)]
pub use member_repository::MockMemberRepository;
