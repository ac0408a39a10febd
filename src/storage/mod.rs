pub mod models;
pub mod reminder_store;

pub use models::*;
pub use reminder_store::ReminderStore;
