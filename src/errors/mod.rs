pub mod types;

pub use types::BcbError;
