pub mod registry;

pub use registry::{by_id, PhaseDescriptor, PhaseId, PhaseStatus, PHASES, ROADMAP_START};
