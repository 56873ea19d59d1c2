pub mod admin;
pub mod conversations;
pub mod credentials;
pub mod health;
pub mod messages;
pub mod models;
pub mod users;
