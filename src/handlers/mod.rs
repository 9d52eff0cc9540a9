// Handlers module

pub mod chat;
pub mod dev;

pub use chat::chat_handler;
pub use dev::{model_check_handler, usage_handler};
