mod answer;
mod feedback;
mod ids;
mod item;
mod progress;
mod result;
mod scenario;
pub mod text;

pub use ids::{IdError, ItemId, ModuleId, ScenarioId, UserId};

pub use answer::{AnswerError, AnswerRecord, AnswerValue};
pub use feedback::{FeedbackPolicy, FeedbackPolicyError, FeedbackTier};
pub use item::{Item, ItemError, ItemKind, Variant};
pub use progress::{AttemptRecord, ModuleProgress, ProgressError, UserProgress};
pub use result::{Completion, ScenarioResult};
pub use scenario::{Difficulty, EvidenceEntry, RevealPolicy, Scenario, ScenarioError};
