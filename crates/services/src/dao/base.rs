use bson::{Document, oid::ObjectId};
use futures::TryStreamExt;
use mongodb::{
    Collection, Database,
    error::{ErrorKind, WriteFailure},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Debug, Error)]
pub enum DaoError {
    #[error("MongoDB error: {0}")]
    Mongo(#[source] mongodb::error::Error),
    #[error("BSON serialization error: {0}")]
    BsonSer(#[from] bson::ser::Error),
    #[error("BSON deserialization error: {0}")]
    BsonDe(#[from] bson::de::Error),
    #[error("Entity not found")]
    NotFound,
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),
    #[error("Database unavailable: {0}")]
    Unavailable(String),
    #[error("Internal: {0}")]
    Internal(String),
    #[error("Could not allocate a unique invite id after {0} attempts")]
    IdExhausted(u32),
}

impl From<mongodb::error::Error> for DaoError {
    fn from(err: mongodb::error::Error) -> Self {
        let unreachable = matches!(
            *err.kind,
            ErrorKind::ServerSelection { .. }
                | ErrorKind::Io(_)
                | ErrorKind::ConnectionPoolCleared { .. }
        );
        if unreachable {
            return DaoError::Unavailable(err.to_string());
        }

        if let ErrorKind::Write(WriteFailure::WriteError(ref write_error)) = *err.kind {
            if write_error.code == DUPLICATE_KEY_CODE {
                return DaoError::DuplicateKey(write_error.message.clone());
            }
        }

        DaoError::Mongo(err)
    }
}

pub type DaoResult<T> = Result<T, DaoError>;

pub struct BaseDao<T: Send + Sync> {
    collection: Collection<T>,
}

impl<T> BaseDao<T>
where
    T: Serialize + for<'de> Deserialize<'de> + Unpin + Send + Sync,
{
    pub fn new(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<T>(collection_name),
        }
    }

    pub fn collection(&self) -> &Collection<T> {
        &self.collection
    }

    pub async fn find_one(&self, filter: Document) -> DaoResult<Option<T>> {
        Ok(self.collection.find_one(filter).await?)
    }

    pub async fn find_many(&self, filter: Document, sort: Option<Document>) -> DaoResult<Vec<T>> {
        let cursor = if let Some(sort) = sort {
            self.collection.find(filter).sort(sort).await?
        } else {
            self.collection.find(filter).await?
        };

        Ok(cursor.try_collect().await?)
    }

    pub async fn insert_one(&self, doc: &T) -> DaoResult<ObjectId> {
        let result = self.collection.insert_one(doc).await?;

        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| DaoError::Internal("inserted_id is not an ObjectId".to_string()))?;
        debug!(?id, collection = %self.collection.name(), "Inserted document");
        Ok(id)
    }

    pub async fn count(&self, filter: Document) -> DaoResult<u64> {
        Ok(self.collection.count_documents(filter).await?)
    }
}
