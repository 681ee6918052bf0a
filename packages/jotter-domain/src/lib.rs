//! Editor-side domain model: the rich-text document tree, plain-text export, the spell checker,
//! and the context menu dispatcher.

pub mod context_menu;
pub mod document;
pub mod export;
pub mod spelling;

mod error;

pub use error::{Error, Result};
