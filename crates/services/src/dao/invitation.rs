use bson::{DateTime, doc};
use datecard_config::InvitationSettings;
use datecard_db::models::{
    Invitation, InvitationResponse, InvitationStatus, InvitationSummary, Response,
};
use futures::TryStreamExt;
use mongodb::{Database, options::ReturnDocument};
use tracing::{debug, info, warn};

use super::base::{BaseDao, DaoError, DaoResult};
use crate::invite_id::generate_invite_id;

/// Sender-supplied fields of a new invitation, already validated.
#[derive(Debug, Clone)]
pub struct NewInvitation {
    pub sender_name: String,
    pub invitee_name: String,
    pub date: DateTime,
    pub place: String,
    pub message: String,
}

pub struct InvitationDao {
    pub base: BaseDao<Invitation>,
    pub responses: BaseDao<InvitationResponse>,
    settings: InvitationSettings,
}

impl InvitationDao {
    pub fn new(db: &Database, settings: InvitationSettings) -> Self {
        Self {
            base: BaseDao::new(db, Invitation::COLLECTION),
            responses: BaseDao::new(db, InvitationResponse::COLLECTION),
            settings,
        }
    }

    pub async fn create(&self, new: NewInvitation) -> DaoResult<Invitation> {
        let id_length = self.settings.id_length;
        self.create_with(new, || generate_invite_id(id_length)).await
    }

    /// Inserts a new invitation, drawing ids from `next_id` until one is
    /// free or `max_id_attempts` collisions have happened.
    pub async fn create_with(
        &self,
        new: NewInvitation,
        mut next_id: impl FnMut() -> String,
    ) -> DaoResult<Invitation> {
        let now = DateTime::now();
        let mut invitation = Invitation {
            id: None,
            invite_id: String::new(),
            sender_name: new.sender_name,
            invitee_name: new.invitee_name,
            date: new.date,
            place: new.place,
            message: new.message,
            status: InvitationStatus::Sent,
            view_count: 0,
            created_at: now,
            updated_at: now,
        };

        let max_attempts = self.settings.max_id_attempts;
        for attempt in 1..=max_attempts {
            invitation.invite_id = next_id();
            match self.base.insert_one(&invitation).await {
                Ok(id) => {
                    invitation.id = Some(id);
                    info!(
                        invite_id = %invitation.invite_id,
                        sender = %invitation.sender_name,
                        "Invitation created"
                    );
                    return Ok(invitation);
                }
                Err(DaoError::DuplicateKey(_)) => {
                    warn!(attempt, invite_id = %invitation.invite_id, "Invite id collision");
                }
                Err(e) => return Err(e),
            }
        }

        Err(DaoError::IdExhausted(max_attempts))
    }

    /// Records one view. The counter bump and the `sent -> seen` step are a
    /// single atomic update; the returned document reflects both.
    pub async fn view(&self, invite_id: &str) -> DaoResult<Invitation> {
        let pipeline = vec![doc! {
            "$set": {
                "view_count": { "$add": [{ "$ifNull": ["$view_count", 0] }, 1_i64] },
                "status": {
                    "$cond": [
                        { "$eq": ["$status", InvitationStatus::Sent.as_str()] },
                        InvitationStatus::Seen.as_str(),
                        "$status"
                    ]
                },
                "updated_at": "$$NOW",
            }
        }];

        let invitation = self
            .base
            .collection()
            .find_one_and_update(doc! { "invite_id": invite_id }, pipeline)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or(DaoError::NotFound)?;

        debug!(
            invite_id,
            views = invitation.view_count,
            status = invitation.status.as_str(),
            "Invitation viewed"
        );
        Ok(invitation)
    }

    /// Applies an invitee response and appends it to the audit trail.
    ///
    /// The status only changes while the invitation is still open; the audit
    /// record is written either way. Returns the status after the call.
    pub async fn respond(
        &self,
        invite_id: &str,
        response: Response,
        ip_address: Option<String>,
    ) -> DaoResult<InvitationStatus> {
        let target: InvitationStatus = response.into();
        let open: Vec<&str> = InvitationStatus::open().iter().map(|s| s.as_str()).collect();

        let updated = self
            .base
            .collection()
            .find_one_and_update(
                doc! { "invite_id": invite_id, "status": { "$in": open } },
                doc! { "$set": { "status": target.as_str(), "updated_at": DateTime::now() } },
            )
            .return_document(ReturnDocument::After)
            .await?;

        let status = match updated {
            Some(invitation) => invitation.status,
            None => {
                // Either missing or already terminal
                self.base
                    .find_one(doc! { "invite_id": invite_id })
                    .await?
                    .ok_or(DaoError::NotFound)?
                    .status
            }
        };

        let record = InvitationResponse {
            id: None,
            invite_id: invite_id.to_string(),
            response,
            responded_at: DateTime::now(),
            ip_address,
        };
        self.responses.insert_one(&record).await?;

        info!(invite_id, ?response, status = status.as_str(), "Invitation response recorded");
        Ok(status)
    }

    pub async fn list_by_sender(&self, sender_name: &str) -> DaoResult<Vec<InvitationSummary>> {
        let cursor = self
            .base
            .collection()
            .clone_with_type::<InvitationSummary>()
            .find(doc! { "sender_name": sender_name })
            .sort(doc! { "created_at": -1, "_id": -1 })
            .projection(InvitationSummary::projection())
            .await?;

        Ok(cursor.try_collect().await?)
    }

    /// Audit trail for one invitation, oldest first.
    pub async fn responses_for(&self, invite_id: &str) -> DaoResult<Vec<InvitationResponse>> {
        self.responses
            .find_many(
                doc! { "invite_id": invite_id },
                Some(doc! { "responded_at": 1, "_id": 1 }),
            )
            .await
    }
}
