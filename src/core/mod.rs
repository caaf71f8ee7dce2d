pub mod chat;
pub mod config;
pub mod conversation;
pub mod group;
pub mod message;
pub mod persona;
pub mod personality;
pub mod providers;
pub mod session;
