use chrono::{DateTime, Utc};
use parley_types::ProviderId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stored credential. Only the fingerprint is kept, never the secret.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub id: String,
    pub user_id: String,
    pub provider: ProviderId,
    pub key_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Which providers a user has configured
pub type CredentialPresence = BTreeMap<ProviderId, bool>;
