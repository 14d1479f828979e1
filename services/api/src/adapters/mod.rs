pub mod chat_llm;
pub mod file_store;

pub use chat_llm::OpenAiChatAdapter;
pub use file_store::FileStore;
