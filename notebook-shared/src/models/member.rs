/// Workspace membership and invitations
///
/// A membership row is created `invited` by the workspace owner and moves to
/// `active` or `declined` only when the invited user responds. The
/// `(user_id, workspace_id)` pair is unique, so inviting an existing member
/// fails with a unique violation.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE member_role AS ENUM ('admin', 'member', 'viewer');
/// CREATE TYPE member_status AS ENUM ('active', 'invited', 'declined', 'archived');
///
/// CREATE TABLE workspace_members (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     workspace_id UUID NOT NULL REFERENCES workspaces(id) ON DELETE CASCADE,
///     role member_role NOT NULL DEFAULT 'member',
///     status member_status NOT NULL DEFAULT 'active',
///     invited_by UUID REFERENCES users(id) ON DELETE SET NULL,
///     invited_at TIMESTAMPTZ,
///     responded_at TIMESTAMPTZ,
///     joined_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

const MEMBER_COLUMNS: &str = "id, user_id, workspace_id, role, status, invited_by, \
     invited_at, responded_at, joined_at";

/// Member role within a workspace
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "member_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Admin,
    #[default]
    Member,
    Viewer,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Admin => "admin",
            MemberRole::Member => "member",
            MemberRole::Viewer => "viewer",
        }
    }
}

/// Membership lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "member_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Active,
    Invited,
    Declined,
    Archived,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Active => "active",
            MemberStatus::Invited => "invited",
            MemberStatus::Declined => "declined",
            MemberStatus::Archived => "archived",
        }
    }
}

/// Response to an invitation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationAction {
    Accept,
    Decline,
}

impl InvitationAction {
    /// Status the invitation moves to
    pub fn resulting_status(&self) -> MemberStatus {
        match self {
            InvitationAction::Accept => MemberStatus::Active,
            InvitationAction::Decline => MemberStatus::Declined,
        }
    }
}

/// Membership row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceMember {
    pub id: Uuid,
    pub user_id: Uuid,
    pub workspace_id: Uuid,
    pub role: MemberRole,
    pub status: MemberStatus,
    pub invited_by: Option<Uuid>,
    pub invited_at: Option<DateTime<Utc>>,
    pub responded_at: Option<DateTime<Utc>>,
    pub joined_at: DateTime<Utc>,
}

impl WorkspaceMember {
    /// Inserts one `invited` row per user in a single statement
    ///
    /// All rows share the same `invited_by` and `invited_at`. Because it is a
    /// single statement, a duplicate anywhere in the batch rejects the whole
    /// batch.
    ///
    /// # Errors
    ///
    /// Returns a unique violation if any user already has a membership row.
    pub async fn invite_many<'e, E>(
        executor: E,
        workspace_id: Uuid,
        invited_by: Uuid,
        user_ids: &[Uuid],
        role: MemberRole,
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO workspace_members
                (user_id, workspace_id, role, status, invited_by, invited_at)
            SELECT invitee, $2, $3, 'invited'::member_status, $4, NOW()
            FROM UNNEST($1::uuid[]) AS invitee
            "#,
        )
        .bind(user_ids)
        .bind(workspace_id)
        .bind(role)
        .bind(invited_by)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    /// Moves a pending invitation to its resulting status
    ///
    /// Only rows currently `invited` are touched; accepting also stamps
    /// `joined_at`. Returns `None` when there was no pending invitation.
    pub async fn respond<'e, E>(
        executor: E,
        workspace_id: Uuid,
        user_id: Uuid,
        action: InvitationAction,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let sql = format!(
            r#"
            UPDATE workspace_members
            SET status = $3,
                responded_at = NOW(),
                joined_at = CASE WHEN $3 = 'active'::member_status THEN NOW() ELSE joined_at END
            WHERE workspace_id = $1 AND user_id = $2 AND status = 'invited'
            RETURNING {MEMBER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, WorkspaceMember>(&sql)
            .bind(workspace_id)
            .bind(user_id)
            .bind(action.resulting_status())
            .fetch_optional(executor)
            .await
    }

    pub async fn list_by_workspace<'e, E>(
        executor: E,
        workspace_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let sql = format!(
            "SELECT {MEMBER_COLUMNS} FROM workspace_members WHERE workspace_id = $1 ORDER BY joined_at ASC"
        );

        sqlx::query_as::<_, WorkspaceMember>(&sql)
            .bind(workspace_id)
            .fetch_all(executor)
            .await
    }

    pub async fn find<'e, E>(
        executor: E,
        workspace_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let sql = format!(
            "SELECT {MEMBER_COLUMNS} FROM workspace_members WHERE workspace_id = $1 AND user_id = $2"
        );

        sqlx::query_as::<_, WorkspaceMember>(&sql)
            .bind(workspace_id)
            .bind(user_id)
            .fetch_optional(executor)
            .await
    }

    /// Counts members whose status is `active`
    pub async fn count_active<'e, E>(executor: E, workspace_id: Uuid) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM workspace_members WHERE workspace_id = $1 AND status = 'active'",
        )
        .bind(workspace_id)
        .fetch_one(executor)
        .await
    }

    pub async fn remove<'e, E>(
        executor: E,
        workspace_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result =
            sqlx::query("DELETE FROM workspace_members WHERE workspace_id = $1 AND user_id = $2")
                .bind(workspace_id)
                .bind(user_id)
                .execute(executor)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invitation_action_transitions() {
        assert_eq!(InvitationAction::Accept.resulting_status(), MemberStatus::Active);
        assert_eq!(InvitationAction::Decline.resulting_status(), MemberStatus::Declined);
    }

    #[test]
    fn test_invitation_action_serde() {
        let action: InvitationAction = serde_json::from_str("\"accept\"").unwrap();
        assert_eq!(action, InvitationAction::Accept);
        assert!(serde_json::from_str::<InvitationAction>("\"maybe\"").is_err());
    }

    #[test]
    fn test_role_and_status_strings() {
        assert_eq!(MemberRole::default(), MemberRole::Member);
        assert_eq!(MemberRole::Admin.as_str(), "admin");
        assert_eq!(MemberStatus::Invited.as_str(), "invited");
        assert_eq!(
            serde_json::to_string(&MemberStatus::Declined).unwrap(),
            "\"declined\""
        );
    }
}
