pub mod collection;
pub mod domain;
pub mod forum;
pub mod memory;
pub mod ports;
pub mod responder;
pub mod scheduler;
pub mod visitors;
mod validation;

pub use collection::{IdGenerator, LocalCollectionStore, Record};
pub use domain::{Meeting, MeetingFormat, MeetingStatus, MeetingType, Question, Reply};
pub use forum::{BoardStats, NewQuestion, NewReply, QuestionBoard, QuestionPatch, SortKey};
pub use memory::MemoryStore;
pub use ports::{ChatCompletionService, KeyValueStore, PortError, PortResult};
pub use responder::{KeywordResponder, Rule, RuleTable};
pub use scheduler::{DayAvailability, MeetingRequest, MeetingScheduler};
pub use visitors::VisitorCounter;
