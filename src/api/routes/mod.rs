pub mod health;
pub mod parse_pdf;
pub mod phases;
pub mod sessions;
