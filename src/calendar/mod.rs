pub mod client;
pub mod credentials;
pub mod mapper;
pub mod models;
pub mod time;

pub use client::CalendarClient;
pub use credentials::{provider_from_config, CredentialProvider};
pub use models::{DisplayRecord, EventDraft, EventPayload};
