//! # ogcard
//!
//! Social-preview card generator with East-Asian aware text layout.
//!
//! ## Overview
//!
//! `ogcard` draws the title, category, author/date line and tags of a blog
//! post onto a template image. Titles are wrapped with kinsoku rules, so
//! closing punctuation never starts a line and opening brackets never end
//! one; tags are packed into a row of filled chips.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use ogcard::{Canvas, FontSystem, card::render_card, config::CardConfig};
//! use ogcard::front_matter::read_front_matter;
//!
//! # fn main() -> ogcard::Result<()> {
//! // 1. Load a font family (`<family>-<Style>.ttf`)
//! let fonts = FontSystem::from_family_dir(Path::new("font"))?;
//!
//! // 2. Read the post header
//! let front_matter = read_front_matter(Path::new("content/post/hello.md"))?;
//!
//! // 3. Draw onto a copy of the template and save it
//! let config = CardConfig::default();
//! let mut canvas = Canvas::open(&config.template)?;
//! render_card(&mut canvas, &front_matter, &config, &fonts)?;
//! canvas.save_png(Path::new("hello.png"))?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! *   **Kinsoku Wrapping**: Line breaking that respects Japanese punctuation rules.
//! *   **Chip Layout**: Left or right aligned rows of padded, filled labels.
//! *   **Font Families**: Styles loaded by file name, shared across worker threads.
//! *   **Hugo Front Matter**: YAML and TOML headers.

pub mod canvas;
pub mod card;
pub mod color;
pub mod config;
pub mod error;
pub mod font_face;
pub mod font_storage;
pub mod font_system;
pub mod front_matter;
pub mod text;

#[cfg(test)]
mod testing;

// common re-exports
pub use canvas::{Canvas, DrawOptions};
pub use error::{CardError, Result};
pub use font_face::{Face, FontFace};
pub use font_storage::{FontStorage, FontStyle};
pub use font_system::FontSystem;

// re-export dependencies
pub use fontdb;
pub use fontdue;
pub use image;
pub use parking_lot;
