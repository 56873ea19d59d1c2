use bson::{doc, Document};
use futures::TryStreamExt;
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection};

use crate::dbs::mongo::models::{MongoUser, MongoUserStats};
use crate::error::Result;

#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<MongoUser>,
}

impl MongoUserRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("users");
        Self { collection }
    }

    pub async fn insert(&self, user: &MongoUser) -> Result<()> {
        self.collection.insert_one(user).await?;
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<Option<MongoUser>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    pub async fn list(&self) -> Result<Vec<MongoUser>> {
        let users = self
            .collection
            .find(doc! {})
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(users)
    }

    pub async fn update(&self, id: &str, set: Document) -> Result<Option<MongoUser>> {
        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<u64> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count)
    }
}

#[derive(Clone)]
pub struct MongoStatsRepository {
    collection: Collection<MongoUserStats>,
}

impl MongoStatsRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("user_stats");
        Self { collection }
    }

    pub async fn insert(&self, stats: &MongoUserStats) -> Result<()> {
        self.collection.insert_one(stats).await?;
        Ok(())
    }

    pub async fn get(&self, user_id: &str) -> Result<Option<MongoUserStats>> {
        Ok(self.collection.find_one(doc! { "user_id": user_id }).await?)
    }

    pub async fn list(&self) -> Result<Vec<MongoUserStats>> {
        Ok(self.collection.find(doc! {}).await?.try_collect().await?)
    }

    /// Apply an update document to the user's stats row
    pub async fn modify(&self, user_id: &str, update: Document) -> Result<Option<MongoUserStats>> {
        let updated = self
            .collection
            .find_one_and_update(doc! { "user_id": user_id }, update)
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated)
    }

    pub async fn delete(&self, user_id: &str) -> Result<()> {
        self.collection.delete_one(doc! { "user_id": user_id }).await?;
        Ok(())
    }
}
