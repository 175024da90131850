//! Member domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Member domain entity.
///
/// `seq` is the store-assigned monotonic sequence number. It exists solely
/// to order and resume cursor pagination and is never serialized: clients
/// only ever see it embedded inside opaque page tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: Uuid,
    // Never serialized; defaulted when rehydrating from the page cache,
    // where ordering has already been applied
    #[serde(skip_serializing, default)]
    pub seq: i64,
    pub email: String,
    pub name: String,
    pub age: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub changed_at: DateTime<Utc>,
    pub changed_by: String,
}

/// Member creation data transfer object
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateMember {
    /// Member email address (unique)
    #[schema(example = "member@example.com")]
    pub email: String,
    /// Member display name
    #[schema(example = "John Doe")]
    pub name: String,
    /// Member age
    #[schema(example = 30)]
    pub age: Option<i32>,
}

/// Member update data transfer object
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateMember {
    /// New display name
    #[schema(example = "Jane Doe")]
    pub name: Option<String>,
    /// New age
    #[schema(example = 31)]
    pub age: Option<i32>,
}

/// Member response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MemberResponse {
    /// Unique member identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    /// Member email address
    #[schema(example = "member@example.com")]
    pub email: String,
    /// Member display name
    #[schema(example = "John Doe")]
    pub name: String,
    /// Member age
    #[schema(example = 30)]
    pub age: Option<i32>,
    /// Record creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub changed_at: DateTime<Utc>,
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self {
            id: member.id,
            email: member.email,
            name: member.name,
            age: member.age,
            created_at: member.created_at,
            changed_at: member.changed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_number_is_not_serialized() {
        let member = Member {
            id: Uuid::new_v4(),
            seq: 42,
            email: "member@example.com".to_string(),
            name: "Test".to_string(),
            age: Some(30),
            created_at: Utc::now(),
            created_by: "system".to_string(),
            changed_at: Utc::now(),
            changed_by: "system".to_string(),
        };

        let json = serde_json::to_string(&member).unwrap();
        assert!(!json.contains("\"seq\""));
    }
}
