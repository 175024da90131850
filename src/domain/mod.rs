//! Domain layer - Core business entities.

mod member;

pub use member::{CreateMember, Member, MemberResponse, UpdateMember};
