//! ttcardgen Render Engine
//!
//! Composes one card image from a merged card config.
//!
//! # Pipeline
//!
//! ```text
//! [Card] background ──┐
//! [Card] backside ────┼── Canvas + border + cut marks
//!                     │         │
//! image* keys ────────┼─────────├── Rotate / Trim / Fit / Gravity
//!                     │         │
//! title* / text* ─────┘         ├── Wrap + shrink + stroke
//!                               ▼
//!                            card.png
//! ```

pub mod canvas;
pub mod compositor;
pub mod fonts;
pub mod text;

pub use canvas::Card;
pub use fonts::FontLibrary;

use ttcardgen_card_model::config::{CardConfig, CardField, FieldKind};
use ttcardgen_common::error::{CardgenError, CardgenResult};

/// Render every field of `config` onto a new card, in config order.
pub fn render_card(config: &CardConfig, fonts: &FontLibrary) -> CardgenResult<Card> {
    let mut card = Card::new(&config.card()?)?;
    let fields = config.fields()?;
    tracing::debug!(fields = fields.len(), "rendering card");

    for field in &fields {
        render_field(&mut card, config, field, fonts)
            .map_err(|e| CardgenError::field(&field.key, e))?;
    }

    Ok(card)
}

fn render_field(
    card: &mut Card,
    config: &CardConfig,
    field: &CardField,
    fonts: &FontLibrary,
) -> CardgenResult<()> {
    let section = config.section(&field.section)?;
    match field.kind {
        FieldKind::Text => {
            tracing::debug!("adding text: {}", field.key);
            card.text(&field.value, &section, fonts)
        }
        FieldKind::Image => {
            tracing::debug!("adding image: {}", field.key);
            card.load_image(&field.value, &section)
        }
    }
}
