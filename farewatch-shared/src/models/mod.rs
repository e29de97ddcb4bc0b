pub mod chat;
pub mod flight;
