//! crates/portfolio_core/src/forum.rs
//!
//! The community Q&A board: questions (newest first) each owning an
//! oldest-first thread of replies, persisted under the `questions` key.

use crate::collection::{LocalCollectionStore, Record};
use crate::domain::{Question, Reply};
use crate::ports::{KeyValueStore, PortError, PortResult};
use crate::validation::{max_chars, optional, required};
use chrono::{Duration, Utc};
use std::collections::HashSet;
use std::sync::Arc;

pub const QUESTIONS_KEY: &str = "questions";

pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_DESCRIPTION_CHARS: usize = 1000;
pub const MAX_REPLY_CHARS: usize = 500;

impl Record for Question {
    fn id(&self) -> u64 {
        self.id
    }

    fn max_issued_id(&self) -> u64 {
        self.replies
            .iter()
            .map(|r| r.id)
            .fold(self.id, u64::max)
    }
}

//=========================================================================================
// Inputs
//=========================================================================================

/// Fields submitted with the "ask a question" form.
#[derive(Debug, Clone, Default)]
pub struct NewQuestion {
    pub title: String,
    pub description: String,
    pub author: String,
    pub email: Option<String>,
}

/// Fields to replace on an existing question. `None` leaves a field alone; a
/// blank email clears it.
#[derive(Debug, Clone, Default)]
pub struct QuestionPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewReply {
    pub text: String,
    pub author: String,
}

/// How `list` orders the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Persisted order, newest first.
    #[default]
    Newest,
    /// Most replies first; ties keep persisted order.
    Popular,
    /// Only questions with no replies, in persisted order.
    Unanswered,
}

impl SortKey {
    /// Unknown keys fall back to `Newest`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "popular" => SortKey::Popular,
            "unanswered" => SortKey::Unanswered,
            _ => SortKey::Newest,
        }
    }
}

impl From<&str> for SortKey {
    fn from(raw: &str) -> Self {
        SortKey::parse(raw)
    }
}

/// Headline numbers shown above the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoardStats {
    pub total_questions: usize,
    pub total_answers: usize,
    /// Distinct names across questions and replies.
    pub unique_authors: usize,
}

//=========================================================================================
// The Board
//=========================================================================================

pub struct QuestionBoard {
    store: LocalCollectionStore<Question>,
}

impl QuestionBoard {
    /// Opens the board, seeding it with the demo questions when nothing is stored.
    pub fn open(backend: Arc<dyn KeyValueStore>) -> Self {
        Self::with_seed(backend, demo_questions)
    }

    /// Opens the board with no seed data.
    pub fn empty(backend: Arc<dyn KeyValueStore>) -> Self {
        Self::with_seed(backend, Vec::new)
    }

    pub fn with_seed<F>(backend: Arc<dyn KeyValueStore>, seed: F) -> Self
    where
        F: Fn() -> Vec<Question> + Send + Sync + 'static,
    {
        Self {
            store: LocalCollectionStore::open(QUESTIONS_KEY, backend, seed),
        }
    }

    pub fn load(&mut self) -> &[Question] {
        self.store.load()
    }

    pub fn get(&self, id: u64) -> PortResult<&Question> {
        self.store.get(id)
    }

    pub fn create(&mut self, input: NewQuestion) -> PortResult<Question> {
        let title = required("title", &input.title)?;
        let author = required("author", &input.author)?;
        let description = input.description.trim().to_string();
        max_chars("title", &title, MAX_TITLE_CHARS)?;
        max_chars("description", &description, MAX_DESCRIPTION_CHARS)?;
        let email = optional(input.email.as_deref());

        self.store.create(|id, created_at| Question {
            id,
            title,
            description,
            author,
            email,
            created_at,
            replies: Vec::new(),
        })
    }

    pub fn update(&mut self, id: u64, patch: QuestionPatch) -> PortResult<Question> {
        self.store.get(id)?;

        let title = patch
            .title
            .map(|t| {
                let t = required("title", &t)?;
                max_chars("title", &t, MAX_TITLE_CHARS)?;
                Ok::<_, PortError>(t)
            })
            .transpose()?;
        let description = patch
            .description
            .map(|d| {
                let d = d.trim().to_string();
                max_chars("description", &d, MAX_DESCRIPTION_CHARS)?;
                Ok::<_, PortError>(d)
            })
            .transpose()?;
        let email = patch.email.map(|e| optional(Some(e.as_str())));

        self.store.update(id, move |question, _| {
            if let Some(title) = title {
                question.title = title;
            }
            if let Some(description) = description {
                question.description = description;
            }
            if let Some(email) = email {
                question.email = email;
            }
            Ok(())
        })
    }

    /// Deletes the question together with its replies.
    pub fn remove(&mut self, id: u64) -> PortResult<Question> {
        self.store.remove(id)
    }

    /// Appends a reply to the question's thread.
    pub fn add_reply(&mut self, question_id: u64, input: NewReply) -> PortResult<Reply> {
        self.store.get(question_id)?;

        let text = required("text", &input.text)?;
        let author = required("author", &input.author)?;
        max_chars("text", &text, MAX_REPLY_CHARS)?;

        let question = self.store.update(question_id, move |question, ids| {
            question.replies.push(Reply {
                id: ids.next_id()?,
                text,
                author,
                created_at: Utc::now(),
            });
            Ok(())
        })?;

        question
            .replies
            .last()
            .cloned()
            .ok_or_else(|| PortError::Unexpected("reply was not stored".to_string()))
    }

    pub fn list(&self, sort: SortKey) -> Vec<&Question> {
        let questions = self.store.records().iter();
        match sort {
            SortKey::Newest => questions.collect(),
            SortKey::Popular => {
                let mut sorted: Vec<&Question> = questions.collect();
                // sort_by is stable, so equal counts keep persisted order
                sorted.sort_by(|a, b| b.replies.len().cmp(&a.replies.len()));
                sorted
            }
            SortKey::Unanswered => questions.filter(|q| q.replies.is_empty()).collect(),
        }
    }

    pub fn stats(&self) -> BoardStats {
        let questions = self.store.records();
        let mut authors: HashSet<&str> = HashSet::new();
        let mut total_answers = 0;

        for question in questions {
            authors.insert(question.author.as_str());
            total_answers += question.replies.len();
            authors.extend(question.replies.iter().map(|r| r.author.as_str()));
        }

        BoardStats {
            total_questions: questions.len(),
            total_answers,
            unique_authors: authors.len(),
        }
    }

    /// Wipes the stored board.
    pub fn clear(&mut self) -> PortResult<()> {
        self.store.clear()
    }
}

//=========================================================================================
// Seed Data
//=========================================================================================

/// The three demo questions a fresh board starts with.
pub fn demo_questions() -> Vec<Question> {
    let now = Utc::now();
    vec![
        Question {
            id: 1,
            title: "How do I get started with Salesforce development?".to_string(),
            description: "I'm new to Salesforce and want to learn Apex and Lightning Components. What's the best learning path?".to_string(),
            author: "Alex Kumar".to_string(),
            email: None,
            created_at: now - Duration::days(2),
            replies: vec![
                Reply {
                    id: 101,
                    text: "Start with Salesforce Trailhead! It's completely free and has comprehensive modules on Apex, Lightning, and more. Gaurav here has 213 badges, so you know it's effective!".to_string(),
                    author: "Gaurav Gupta".to_string(),
                    created_at: now - Duration::hours(48),
                },
                Reply {
                    id: 102,
                    text: "I'd also recommend joining the Salesforce community forums and attending local user groups.".to_string(),
                    author: "Sarah Mitchell".to_string(),
                    created_at: now - Duration::hours(24),
                },
            ],
        },
        Question {
            id: 2,
            title: "What's the best practice for error handling in Apex?".to_string(),
            description: "I keep getting errors in production. How should I properly handle exceptions in Apex to make the code more robust?".to_string(),
            author: "Developer Dave".to_string(),
            email: None,
            created_at: now - Duration::days(1),
            replies: vec![Reply {
                id: 103,
                text: "Use try-catch blocks for predictable errors and custom exceptions for business logic. Always log errors for debugging!".to_string(),
                author: "John Chen".to_string(),
                created_at: now - Duration::hours(23),
            }],
        },
        Question {
            id: 3,
            title: "How to optimize SOQL queries for large datasets?".to_string(),
            description: "My batch job is timing out when processing 100k+ records. How can I optimize queries?".to_string(),
            author: "Performance Pete".to_string(),
            email: None,
            created_at: now - Duration::hours(1),
            replies: Vec::new(),
        },
    ]
}
