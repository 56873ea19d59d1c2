use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    /// Caller-chosen id (e.g. from an identity provider); generated when absent
    #[serde(default)]
    pub id: Option<String>,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub role: UserRole,
}

impl NewUser {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: None,
            email: email.into(),
            name: name.into(),
            role: UserRole::User,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }

    pub fn into_user(self, now: DateTime<Utc>) -> User {
        User {
            id: self.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            email: self.email,
            name: self.name,
            role: self.role,
            status: UserStatus::Active,
            last_login: None,
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
}

impl UserUpdate {
    pub fn apply(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name = name.clone();
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(status) = self.status {
            user.status = status;
        }
    }
}

/// Usage counters kept alongside each user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub id: String,
    pub user_id: String,
    pub session_count: u64,
    /// Minutes
    pub total_usage_time: u64,
    pub favorite_model: Option<String>,
    pub last_activity: Option<DateTime<Utc>>,
    pub messages_sent: u64,
}

impl UserStats {
    pub fn zeroed(user_id: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            session_count: 0,
            total_usage_time: 0,
            favorite_model: None,
            last_activity: None,
            messages_sent: 0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsUpdate {
    pub session_count: Option<u64>,
    pub total_usage_time: Option<u64>,
    pub favorite_model: Option<String>,
    pub last_activity: Option<DateTime<Utc>>,
    pub messages_sent: Option<u64>,
}

impl StatsUpdate {
    pub fn apply(&self, stats: &mut UserStats) {
        if let Some(count) = self.session_count {
            stats.session_count = count;
        }
        if let Some(minutes) = self.total_usage_time {
            stats.total_usage_time = minutes;
        }
        if let Some(model) = &self.favorite_model {
            stats.favorite_model = Some(model.clone());
        }
        if let Some(at) = self.last_activity {
            stats.last_activity = Some(at);
        }
        if let Some(sent) = self.messages_sent {
            stats.messages_sent = sent;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelUsage {
    pub model: String,
    pub count: u64,
}

/// Signups on one calendar day (UTC)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySignups {
    pub date: NaiveDate,
    /// Short weekday name ("Mon")
    pub day: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_users: u64,
    pub active_users: u64,
    /// One entry per day of the last 7, oldest first
    pub user_growth: Vec<DailySignups>,
    /// Minutes per session, one decimal
    pub average_session_time: String,
    pub model_usage: Vec<ModelUsage>,
}
