use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invitation {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub invite_id: String,
    pub sender_name: String,
    pub invitee_name: String,
    pub date: DateTime,
    pub place: String,
    pub message: String,
    #[serde(default)]
    pub status: InvitationStatus,
    #[serde(default)]
    pub view_count: i64,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// Lifecycle stage of an invitation.
///
/// Moves forward only: `sent -> seen -> accepted | rejected`. The two
/// response states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    #[default]
    Sent,
    Seen,
    Accepted,
    Rejected,
}

impl InvitationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Seen => "seen",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    /// Statuses from which a response may still change the invitation.
    pub fn open() -> [Self; 2] {
        [Self::Sent, Self::Seen]
    }
}

/// Display fields returned when listing a sender's invitations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationSummary {
    pub invite_id: String,
    pub invitee_name: String,
    pub date: DateTime,
    pub place: String,
    #[serde(default)]
    pub status: InvitationStatus,
    #[serde(default)]
    pub view_count: i64,
    pub created_at: DateTime,
}

impl InvitationSummary {
    pub fn projection() -> bson::Document {
        bson::doc! {
            "_id": 0,
            "invite_id": 1,
            "invitee_name": 1,
            "date": 1,
            "place": 1,
            "status": 1,
            "view_count": 1,
            "created_at": 1,
        }
    }
}

impl Invitation {
    pub const COLLECTION: &'static str = "invitations";
}
