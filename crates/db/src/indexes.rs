use mongodb::{Database, IndexModel, options::IndexOptions};
use tracing::info;

use crate::models::{Invitation, InvitationResponse};

pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    // Invitations
    create_indexes(
        db,
        Invitation::COLLECTION,
        vec![
            index_unique(bson::doc! { "invite_id": 1 }),
            index(bson::doc! { "status": 1 }),
            index(bson::doc! { "sender_name": 1, "created_at": -1 }),
        ],
    )
    .await?;

    // Invitation responses
    create_indexes(
        db,
        InvitationResponse::COLLECTION,
        vec![index(bson::doc! { "invite_id": 1, "responded_at": 1 })],
    )
    .await?;

    info!("All indexes ensured");
    Ok(())
}

fn index(keys: bson::Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}

fn index_unique(keys: bson::Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

async fn create_indexes(
    db: &Database,
    collection: &str,
    indexes: Vec<IndexModel>,
) -> Result<(), mongodb::error::Error> {
    db.collection::<bson::Document>(collection)
        .create_indexes(indexes)
        .await?;
    info!(collection, "Indexes created");
    Ok(())
}
