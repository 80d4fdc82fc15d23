//! ttcardgen Card Model
//!
//! Defines the data contracts between a card config and the renderer:
//! - **Config:** Card config loading, template merge, and file search paths
//! - **Layout:** Typed accessors for layout sections (areas, gravity, colours)
//! - **Example:** The annotated example config listing every supported key
//!
//! All area coordinates are card pixels, relative to the top-left corner of
//! the card background (the border is added by the renderer).

pub mod area;
pub mod colour;
pub mod config;
pub mod example;
pub mod layout;

pub use area::*;
pub use colour::*;
pub use config::*;
pub use example::*;
pub use layout::*;
