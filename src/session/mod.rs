pub mod events;
pub mod manager;
pub mod orchestrator;
pub mod progress;
pub mod random;
pub mod state;

pub use events::SessionEvent;
pub use manager::SessionManager;
pub use orchestrator::{DemoSession, GenerationOutcome};
pub use progress::DemoTiming;
pub use random::{RandomSource, SequenceRandom, ThreadRandom};
pub use state::{Feedback, SessionSnapshot, SessionState, TtrComparison, View};
