use bson::{doc, Bson};
use futures::TryStreamExt;
use mongodb::{Client, Collection};
use std::collections::HashMap;

use crate::dbs::mongo::models::MongoMessage;
use crate::error::Result;

#[derive(Clone)]
pub struct MongoMessageRepository {
    collection: Collection<MongoMessage>,
}

impl MongoMessageRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("messages");
        Self { collection }
    }

    pub async fn insert(&self, message: &MongoMessage) -> Result<()> {
        self.collection.insert_one(message).await?;
        Ok(())
    }

    /// Oldest first, `_id` breaks ties
    pub async fn list(&self, conversation_id: &str) -> Result<Vec<MongoMessage>> {
        let messages = self
            .collection
            .find(doc! { "conversation_id": conversation_id })
            .sort(doc! { "timestamp": 1, "_id": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(messages)
    }

    pub async fn delete_for_conversation(&self, conversation_id: &str) -> Result<u64> {
        let result = self
            .collection
            .delete_many(doc! { "conversation_id": conversation_id })
            .await?;
        Ok(result.deleted_count)
    }

    /// Assistant message count per model id
    pub async fn count_by_model(&self) -> Result<HashMap<String, u64>> {
        let pipeline = vec![
            doc! { "$match": { "role": "assistant", "model": { "$type": "string" } } },
            doc! { "$group": { "_id": "$model", "count": { "$sum": 1 } } },
        ];

        let rows: Vec<bson::Document> = self
            .collection
            .aggregate(pipeline)
            .await?
            .try_collect()
            .await?;

        let counts = rows
            .into_iter()
            .filter_map(|row| {
                let model = row.get_str("_id").ok()?.to_string();
                let count = match row.get("count")? {
                    Bson::Int32(n) => *n as i64,
                    Bson::Int64(n) => *n,
                    _ => return None,
                };
                Some((model, count.max(0) as u64))
            })
            .collect();
        Ok(counts)
    }
}
