pub mod gateway;
pub mod store;
pub mod word;

pub use gateway::WordGateway;
pub use store::{ListKind, WordStore};
pub use word::Word;
