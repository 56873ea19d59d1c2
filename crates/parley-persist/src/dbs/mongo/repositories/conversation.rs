use bson::{doc, Document};
use futures::TryStreamExt;
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection};

use crate::dbs::mongo::models::MongoConversation;
use crate::error::Result;

#[derive(Clone)]
pub struct MongoConversationRepository {
    collection: Collection<MongoConversation>,
}

impl MongoConversationRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("conversations");
        Self { collection }
    }

    pub async fn insert(&self, conversation: &MongoConversation) -> Result<()> {
        self.collection.insert_one(conversation).await?;
        Ok(())
    }

    pub async fn get(&self, id: &str, user_id: &str) -> Result<Option<MongoConversation>> {
        let filter = doc! { "_id": id, "user_id": user_id };
        Ok(self.collection.find_one(filter).await?)
    }

    /// Apply `$set` fields and return the updated document
    pub async fn update(&self, id: &str, set: Document) -> Result<Option<MongoConversation>> {
        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated)
    }

    /// Bump `updated_at`; false when the conversation does not exist
    pub async fn touch(&self, id: &str, at: bson::DateTime) -> Result<bool> {
        let result = self
            .collection
            .update_one(doc! { "_id": id }, doc! { "$max": { "updated_at": at } })
            .await?;
        Ok(result.matched_count > 0)
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<MongoConversation>> {
        let conversations = self
            .collection
            .find(doc! { "user_id": user_id })
            .sort(doc! { "updated_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(conversations)
    }

    pub async fn delete(&self, id: &str) -> Result<u64> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count)
    }
}
