use bson::doc;
use futures::TryStreamExt;
use mongodb::{Client, Collection};
use parley_types::ProviderId;

use crate::dbs::mongo::models::MongoCredential;
use crate::error::Result;

#[derive(Clone)]
pub struct MongoCredentialRepository {
    collection: Collection<MongoCredential>,
}

impl MongoCredentialRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("api_keys");
        Self { collection }
    }

    /// One record per (user, provider); hash and timestamp refreshed on update
    pub async fn upsert(
        &self,
        user_id: &str,
        provider: ProviderId,
        key_hash: &str,
        at: bson::DateTime,
    ) -> Result<()> {
        let filter = doc! { "user_id": user_id, "provider": provider.as_str() };
        let update = doc! {
            "$set": { "key_hash": key_hash, "created_at": at },
            "$setOnInsert": { "_id": uuid::Uuid::new_v4().to_string() },
        };
        self.collection.update_one(filter, update).upsert(true).await?;
        Ok(())
    }

    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<MongoCredential>> {
        let records = self
            .collection
            .find(doc! { "user_id": user_id })
            .await?
            .try_collect()
            .await?;
        Ok(records)
    }

    pub async fn delete(&self, user_id: &str, provider: ProviderId) -> Result<()> {
        let filter = doc! { "user_id": user_id, "provider": provider.as_str() };
        self.collection.delete_one(filter).await?;
        Ok(())
    }
}
