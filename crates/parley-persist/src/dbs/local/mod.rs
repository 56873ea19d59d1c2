mod credential;

pub use credential::{LocalCredentialStore, LOCAL_KEY_PREFIX};
