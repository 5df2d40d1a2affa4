//! Deterministic projection of a generated presentation into downloadable
//! documents: a paginated landscape PDF (one page per slide) and a lossless
//! JSON export of the presentation data.

// Export error module - Shared error types
pub mod error;
pub use error::*;

// Export layout module - Page geometry and text wrapping
pub mod layout;

// Export project module - Presentation -> page layout mapping
pub mod project;
pub use project::{project, BulletBlock, ImagePlacement, PageLayout};

// Export pdf module - Page layout -> PDF bytes
pub mod pdf;
pub use pdf::{render_pdf, write_pdf_file};

// Export export module - Output naming and JSON data export
pub mod export;
pub use export::*;
