use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

use super::invitation::InvitationStatus;

/// Append-only audit record of one invitee response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationResponse {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub invite_id: String,
    pub response: Response,
    pub responded_at: DateTime,
    pub ip_address: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Response {
    Accepted,
    Rejected,
}

impl From<Response> for InvitationStatus {
    fn from(response: Response) -> Self {
        match response {
            Response::Accepted => InvitationStatus::Accepted,
            Response::Rejected => InvitationStatus::Rejected,
        }
    }
}

impl InvitationResponse {
    pub const COLLECTION: &'static str = "invitation_responses";
}
