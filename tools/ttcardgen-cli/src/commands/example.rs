//! Print the annotated example config.

use ttcardgen_card_model::example::DEFAULT_CONFIG;

pub fn run() -> anyhow::Result<()> {
    println!("{DEFAULT_CONFIG}");
    Ok(())
}
