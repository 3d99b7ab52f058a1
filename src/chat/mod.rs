//! Conversational core: message history, query dispatch and prompt suggestions

pub mod dispatcher;
pub mod message;
pub mod questions;

pub use dispatcher::{QueryDispatcher, QueryReply, QueryRequest, Rejected};
pub use message::{ChartPayload, Message, Role};
pub use questions::{predefined_questions, SuggestionCursor};
