//! Storage infrastructure - Conversation store implementations

mod in_memory;
pub mod migrations;
mod sqlite;

pub use in_memory::InMemoryConversationRepository;
pub use migrations::{run_migrations, Migration};
pub use sqlite::{SqliteConfig, SqliteConversationRepository};
