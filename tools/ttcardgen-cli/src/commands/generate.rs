//! Render one card config to a PNG file.

use std::path::{Path, PathBuf};

use ttcardgen_card_model::config::CardConfig;
use ttcardgen_common::config::Settings;
use ttcardgen_render_engine::{render_card, FontLibrary};

/// Options of a single card render.
#[derive(Debug, Clone)]
pub struct GenerateArgs {
    pub config: PathBuf,
    pub output: PathBuf,
    /// Overwrite an existing output file.
    pub force: bool,
    /// Settings file; `~/.rpgcardgen.cfg` when unset.
    pub settings: Option<PathBuf>,
}

pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    check_output(&args.output, args.force)?;

    let settings = match &args.settings {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load(),
    };

    let config = CardConfig::load(&args.config, &settings)?;
    tracing::trace!("merged config:\n{config}");

    let fonts = FontLibrary::new(&settings.font_paths);
    let card = render_card(&config, &fonts)?;
    card.save(&args.output)?;

    tracing::info!(output = %args.output.display(), "card written");
    Ok(())
}

/// Refuse to replace an existing output unless forced.
fn check_output(output: &Path, force: bool) -> anyhow::Result<()> {
    if !force && output.exists() {
        anyhow::bail!("output already exists");
    }
    Ok(())
}
