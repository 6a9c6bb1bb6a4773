//! Team domain models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::user::UserPublic;

/// A named group of users with a single owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Team {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    /// Secret join code; only ever serialized towards the owner.
    pub identifier: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A confirmed association of a user to a team.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TeamMembership {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub joined_at: DateTime<Utc>,
}

/// An unconfirmed join request awaiting owner approval.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PendingMember {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub requested_at: DateTime<Utc>,
}

/// Request payload for creating a team.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateTeamRequest {
    #[validate(length(
        min = 1,
        max = 25,
        message = "Title must be between 1 and 25 characters"
    ))]
    pub title: String,
}

/// Request payload for joining a team by its identifier.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct JoinTeamRequest {
    #[validate(length(
        min = 1,
        max = 20,
        message = "Identifier must be between 1 and 20 characters"
    ))]
    pub identifier: String,
}

/// Request payload for renaming a team.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct RenameTeamRequest {
    #[validate(length(
        min = 1,
        max = 25,
        message = "Title must be between 1 and 25 characters"
    ))]
    pub title: String,
}

/// Request payload for changing a team's join identifier.
///
/// When `identifier` is omitted a fresh one is generated server-side.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct ChangeIdentifierRequest {
    #[validate(length(
        min = 6,
        max = 20,
        message = "Identifier must be between 6 and 20 characters"
    ))]
    pub identifier: Option<String>,
}

/// Response for creating a team.
///
/// Includes the join identifier, since the creator is the owner.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateTeamResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub identifier: String,
    pub owner_id: Uuid,
    pub member_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Team entry in the caller's team listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TeamSummary {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub is_owner: bool,
}

/// Query parameters for listing teams.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListTeamsQuery {
    /// When true, only teams the caller owns.
    pub owned: Option<bool>,
}

/// Response for listing the caller's teams.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListTeamsResponse {
    pub data: Vec<TeamSummary>,
    pub count: usize,
}

/// Member entry in the team management view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MemberResponse {
    pub user: UserPublic,
    pub joined_at: DateTime<Utc>,
}

/// Pending join request entry, visible to the owner only.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PendingResponse {
    pub user: UserPublic,
    pub requested_at: DateTime<Utc>,
}

/// Team management view.
///
/// `identifier` and `pending` are present only when the caller owns the team.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TeamDetail {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub owner: UserPublic,
    pub is_owner: bool,
    pub members: Vec<MemberResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending: Option<Vec<PendingResponse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Response after a successful join request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct JoinTeamResponse {
    pub message: String,
}

/// Generate a URL-safe slug from a team title.
///
/// Lowercases, converts whitespace/underscores to hyphens, strips everything
/// else, and collapses consecutive separators.
pub fn generate_slug(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                ' ' // Will be filtered out
            }
        })
        .filter(|c| c.is_alphanumeric() || *c == '-')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_generate_slug_basic() {
        assert_eq!(generate_slug("My Team"), "my-team");
    }

    #[test]
    fn test_generate_slug_collapses_separators() {
        assert_eq!(generate_slug("My  --  Team"), "my-team");
        assert_eq!(generate_slug("one__two"), "one-two");
    }

    #[test]
    fn test_generate_slug_strips_punctuation() {
        assert_eq!(generate_slug("Bob's Team!"), "bobs-team");
    }

    #[test]
    fn test_generate_slug_preserves_unicode_alphanumerics() {
        assert_eq!(generate_slug("Équipe Été"), "équipe-été");
    }

    #[test]
    fn test_generate_slug_empty_and_symbols_only() {
        assert_eq!(generate_slug(""), "");
        assert_eq!(generate_slug("!!!"), "");
    }

    #[test]
    fn test_create_team_request_validation() {
        let ok = CreateTeamRequest {
            title: "My Team".to_string(),
        };
        assert!(ok.validate().is_ok());

        let empty = CreateTeamRequest {
            title: String::new(),
        };
        assert!(empty.validate().is_err());

        let too_long = CreateTeamRequest {
            title: "x".repeat(26),
        };
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn test_join_team_request_validation() {
        let ok = JoinTeamRequest {
            identifier: "a1b2c3d4e5f6078".to_string(),
        };
        assert!(ok.validate().is_ok());

        let empty = JoinTeamRequest {
            identifier: String::new(),
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_change_identifier_request_allows_omission() {
        let regenerate = ChangeIdentifierRequest { identifier: None };
        assert!(regenerate.validate().is_ok());

        let too_short = ChangeIdentifierRequest {
            identifier: Some("abc".to_string()),
        };
        assert!(too_short.validate().is_err());
    }

    #[test]
    fn test_team_detail_hides_identifier_for_non_owner() {
        let detail = TeamDetail {
            id: Uuid::new_v4(),
            title: "My Team".to_string(),
            slug: "my-team".to_string(),
            owner: UserPublic {
                id: Uuid::new_v4(),
                username: "alice".to_string(),
            },
            is_owner: false,
            members: vec![],
            pending: None,
            identifier: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&detail).unwrap();
        assert!(json.get("identifier").is_none());
        assert!(json.get("pending").is_none());
    }
}
