pub mod health;
pub mod random;
pub mod reminder;
