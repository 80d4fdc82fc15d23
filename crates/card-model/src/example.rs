//! The annotated example config printed by `ttcardgen --example`.
//!
//! It is also the base document every card config is merged onto, which
//! is why it declares the (empty) `Card`, `Image`, `Title` and `Text`
//! sections.

/// Default border width in pixels.
pub const DEFAULT_BORDER: u32 = 20;
/// Default border colour.
pub const DEFAULT_BORDER_COLOUR: &str = "black";
/// Default font size in points.
pub const DEFAULT_FONT_SIZE: f32 = 20.0;
/// Default fill and outline colour of text.
pub const DEFAULT_TEXT_COLOUR: &str = "black";
/// Default for `resize` in image sections.
pub const DEFAULT_RESIZE: bool = true;
/// Default for `trim` in image sections.
pub const DEFAULT_TRIM: bool = true;

pub const DEFAULT_CONFIG: &str = "\
[Card]
# layout shared by many cards; its sections are overridden by this file
#template: templates/item.cfg
# card front, defines the card size
#background: card_background.png
# optional card back, printed upside down below the front
#backside: card_backside.png
#border: 20
#border_colour: black
# every key starting with image, title or text is drawn using the section
# of the same name with a capital first letter (image2 uses [Image2])
#image: items/fork.png
#title: A Fork
#text: Use this to eat spaghetti

[Image]
#area: x y width height
#resize: true
#trim: true
#gravity: center
# degrees, clockwise
#rotate: 30.6

[Title]
# accepts the same keys as [Text]

[Text]
#area: x y width height
# a .ttf file or a font family name
#font: fonts/textfont.ttf
#font_size: 20
#font_colour: black
#font_border_colour: black
#gravity: center
# the area is rotated around its center
#rotate: 30.6

[DEFAULT]
# fallbacks for every section, can be overridden per section
#font_size: 60
";

#[cfg(test)]
mod tests {
    use super::*;
    use ttcardgen_common::ini::IniDocument;

    #[test]
    fn test_example_config_parses_with_base_sections() {
        let doc = IniDocument::parse(DEFAULT_CONFIG).unwrap();
        let names: Vec<&str> = doc.section_names().collect();
        assert_eq!(names, vec!["Card", "Image", "Title", "Text"]);
        assert!(doc.defaults().is_empty());
        assert!(doc.section("Card").unwrap().keys().is_empty());
    }
}
