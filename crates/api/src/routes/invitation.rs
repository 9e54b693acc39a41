use std::borrow::Cow;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use datecard_db::models::{Invitation, InvitationStatus, InvitationSummary, Response};
use datecard_services::{dao::NewInvitation, parse_event_date};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{error::ApiError, extractors::ClientIp, state::AppState};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvitationRequest {
    #[validate(length(min = 1, max = 80, message = "Sender name must be 1-80 characters"))]
    pub sender_name: String,
    #[validate(length(min = 1, max = 80, message = "Invitee name must be 1-80 characters"))]
    pub invitee_name: String,
    pub date: String,
    #[validate(length(min = 1, max = 120, message = "Place must be 1-120 characters"))]
    pub place: String,
    #[validate(length(min = 1, max = 2000, message = "Message must be 1-2000 characters"))]
    pub message: String,
}

impl CreateInvitationRequest {
    /// Names and place are stored trimmed; the message is kept verbatim.
    fn normalized(self) -> Self {
        Self {
            sender_name: self.sender_name.trim().to_string(),
            invitee_name: self.invitee_name.trim().to_string(),
            date: self.date.trim().to_string(),
            place: self.place.trim().to_string(),
            message: self.message,
        }
    }
}

fn invalid_date() -> ValidationError {
    let mut err = ValidationError::new("invalid_date");
    err.message = Some(Cow::from("Invalid date"));
    err
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedInvitationResponse {
    pub invite_id: String,
    pub share_path: String,
    pub share_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListInvitationsQuery {
    pub sender_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub response: Response,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationView {
    pub invite_id: String,
    pub sender_name: String,
    pub invitee_name: String,
    pub date: DateTime<Utc>,
    pub place: String,
    pub message: String,
    pub status: InvitationStatus,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Invitation> for InvitationView {
    fn from(invitation: Invitation) -> Self {
        Self {
            invite_id: invitation.invite_id,
            sender_name: invitation.sender_name,
            invitee_name: invitation.invitee_name,
            date: invitation.date.to_chrono(),
            place: invitation.place,
            message: invitation.message,
            status: invitation.status,
            view_count: invitation.view_count,
            created_at: invitation.created_at.to_chrono(),
            updated_at: invitation.updated_at.to_chrono(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationSummaryView {
    pub invite_id: String,
    pub invitee_name: String,
    pub date: DateTime<Utc>,
    pub place: String,
    pub status: InvitationStatus,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<InvitationSummary> for InvitationSummaryView {
    fn from(summary: InvitationSummary) -> Self {
        Self {
            invite_id: summary.invite_id,
            invitee_name: summary.invitee_name,
            date: summary.date.to_chrono(),
            place: summary.place,
            status: summary.status,
            view_count: summary.view_count,
            created_at: summary.created_at.to_chrono(),
        }
    }
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateInvitationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedInvitationResponse>), ApiError> {
    let Json(body) = payload?;
    let body = body.normalized();

    // Field bounds and the date are reported together
    let date = match (body.validate(), parse_event_date(&body.date)) {
        (Ok(()), Some(date)) => date,
        (result, date) => {
            let mut errors = result.err().unwrap_or_else(ValidationErrors::new);
            if date.is_none() {
                errors.add("date", invalid_date());
            }
            return Err(errors.into());
        }
    };

    let invitation = state
        .invitations
        .create(NewInvitation {
            sender_name: body.sender_name,
            invitee_name: body.invitee_name,
            date,
            place: body.place,
            message: body.message,
        })
        .await?;

    let share_path = format!("/invite/{}", invitation.invite_id);
    let share_url = format!(
        "{}{}",
        state.settings.app.public_base_url.trim_end_matches('/'),
        share_path
    );

    Ok((
        StatusCode::CREATED,
        Json(CreatedInvitationResponse {
            invite_id: invitation.invite_id,
            share_path,
            share_url,
        }),
    ))
}

pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ListInvitationsQuery>, QueryRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Query(params) = query?;
    let sender_name = params
        .sender_name
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing senderName".to_string()))?;

    let invites: Vec<InvitationSummaryView> = state
        .invitations
        .list_by_sender(&sender_name)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(serde_json::json!({ "invites": invites })))
}

pub async fn get(
    State(state): State<AppState>,
    Path(invite_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let invitation = state
        .invitations
        .view(&invite_id)
        .await
        .map_err(ApiError::unavailable_as_internal)?;
    let invite = InvitationView::from(invitation);

    Ok(Json(serde_json::json!({ "invite": invite })))
}

pub async fn respond(
    State(state): State<AppState>,
    Path(invite_id): Path<String>,
    ClientIp(ip): ClientIp,
    payload: Result<Json<RespondRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(body) = payload?;

    let status = state
        .invitations
        .respond(&invite_id, body.response, ip)
        .await
        .map_err(ApiError::unavailable_as_internal)?;

    Ok(Json(serde_json::json!({ "status": status })))
}
