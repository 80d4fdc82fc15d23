use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use ttcardgen_card_model::config::CardConfig;
use ttcardgen_common::config::Settings;
use ttcardgen_render_engine::{render_card, FontLibrary};

const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// A fresh directory holding the images shared by every card fixture.
fn fixture_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ttcardgen_test_render_{name}"));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();

    RgbaImage::from_pixel(100, 150, RED)
        .save(dir.join("background.png"))
        .unwrap();
    RgbaImage::from_pixel(50, 75, BLUE)
        .save(dir.join("backside.png"))
        .unwrap();

    let mut icon = RgbaImage::from_pixel(40, 40, WHITE);
    for x in 10..30 {
        for y in 10..30 {
            icon.put_pixel(x, y, GREEN);
        }
    }
    icon.save(dir.join("icon.png")).unwrap();

    dir
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn load(card: &Path) -> CardConfig {
    CardConfig::load(card, &Settings::default()).expect("card config should load")
}

#[test]
fn card_with_backside_and_image_is_composed() {
    let dir = fixture_dir("full");
    write(
        &dir,
        "template.cfg",
        "[Card]\nbackground: background.png\nborder: 10\n\n[Image]\narea: 0 0 50 50\n",
    );
    let card_path = write(
        &dir,
        "card.cfg",
        "[Card]\ntemplate: template.cfg\nbackside: backside.png\nimage: icon.png\n",
    );

    let config = load(&card_path);
    let card = render_card(&config, &FontLibrary::new(&[])).unwrap();
    let img = card.image();

    assert_eq!(img.dimensions(), (120, 340));
    assert_eq!(card.card_size(), (100, 150));
    assert_eq!(card.border(), 10);

    // Border and cut marks in the inverse colour, front and back.
    assert_eq!(*img.get_pixel(2, 2), BLACK);
    assert_eq!(*img.get_pixel(4, 9), WHITE);
    assert_eq!(*img.get_pixel(4, 179), WHITE);
    assert_eq!(*img.get_pixel(109, 175), WHITE);

    // Front, with the trimmed icon scaled up to the 50x50 area.
    assert_eq!(*img.get_pixel(100, 150), RED);
    assert_eq!(*img.get_pixel(35, 35), GREEN);
    assert_eq!(*img.get_pixel(58, 58), GREEN);
    assert_eq!(*img.get_pixel(65, 35), RED);

    // Back is stretched to the card size.
    assert_eq!(*img.get_pixel(60, 255), BLUE);
    assert_eq!(*img.get_pixel(10, 180), BLUE);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn saved_card_is_png_whatever_the_extension() {
    let dir = fixture_dir("save");
    write(&dir, "template.cfg", "[Card]\nbackground: background.png\n");
    let card_path = write(&dir, "card.cfg", "[Card]\ntemplate: template.cfg\n");

    let card = render_card(&load(&card_path), &FontLibrary::new(&[])).unwrap();
    let out = dir.join("card.jpg");
    card.save(&out).unwrap();

    let bytes = std::fs::read(&out).unwrap();
    assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_layout_section_is_a_config_error() {
    let dir = fixture_dir("no_section");
    write(&dir, "template.cfg", "[Card]\nbackground: background.png\n");
    let card_path = write(
        &dir,
        "card.cfg",
        "[Card]\ntemplate: template.cfg\ntext2: Hello\n",
    );

    let err = render_card(&load(&card_path), &FontLibrary::new(&[])).unwrap_err();
    assert!(err.is_config());
    assert_eq!(err.to_string(), "text2: missing config section 'Text2'");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn image_without_area_is_a_config_error() {
    let dir = fixture_dir("no_area");
    write(&dir, "template.cfg", "[Card]\nbackground: background.png\n");
    let card_path = write(
        &dir,
        "card.cfg",
        "[Card]\ntemplate: template.cfg\nimage: icon.png\n",
    );

    let err = render_card(&load(&card_path), &FontLibrary::new(&[])).unwrap_err();
    assert!(err.is_config());
    assert_eq!(err.to_string(), "image: 'area' undefined");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn title_is_drawn_inside_its_area() {
    let fonts = FontLibrary::new(&[]);
    if fonts.resolve(None).is_err() {
        eprintln!("skipping: no system font available");
        return;
    }

    let dir = fixture_dir("title");
    write(
        &dir,
        "template.cfg",
        "[Card]\nbackground: background.png\nborder: 0\n\n\
         [Title]\narea: 0 0 100 40\nfont_colour: white\nfont_border_colour: white\n",
    );
    let card_path = write(
        &dir,
        "card.cfg",
        "[Card]\ntemplate: template.cfg\ntitle: A Fork\n",
    );

    let card = render_card(&load(&card_path), &fonts).unwrap();
    let img = card.image();

    let inside = (0..100)
        .flat_map(|x| (0..40).map(move |y| (x, y)))
        .filter(|&(x, y)| *img.get_pixel(x, y) != RED)
        .count();
    assert!(inside > 0, "title should change pixels in its area");

    let below = (0..100)
        .flat_map(|x| (45..150).map(move |y| (x, y)))
        .filter(|&(x, y)| *img.get_pixel(x, y) != RED)
        .count();
    assert_eq!(below, 0);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn rotated_text_stays_centred_on_its_area() {
    let fonts = FontLibrary::new(&[]);
    if fonts.resolve(None).is_err() {
        eprintln!("skipping: no system font available");
        return;
    }

    let dir = fixture_dir("rotated_title");
    write(
        &dir,
        "template.cfg",
        "[Card]\nbackground: background.png\nborder: 0\n\n\
         [Title]\narea: 0 50 100 40\nrotate: 90\n\
         font_colour: white\nfont_border_colour: white\n",
    );
    let card_path = write(
        &dir,
        "card.cfg",
        "[Card]\ntemplate: template.cfg\ntitle: A Fork\n",
    );

    let card = render_card(&load(&card_path), &fonts).unwrap();
    let img = card.image();

    let changed: Vec<(u32, u32)> = img
        .enumerate_pixels()
        .filter(|(_, _, p)| **p != RED)
        .map(|(x, y, _)| (x, y))
        .collect();
    assert!(!changed.is_empty(), "rotated title should change pixels");

    // The 100x40 box turned upright is 40x100, centred on (50, 70).
    assert!(changed.iter().all(|&(x, y)| (30..70).contains(&x) && (20..120).contains(&y)));
    // Turned text runs past the top or bottom of the unrotated area.
    assert!(changed.iter().any(|&(_, y)| !(50..90).contains(&y)));

    let (min_x, max_x) = changed
        .iter()
        .fold((u32::MAX, 0), |(lo, hi), &(x, _)| (lo.min(x), hi.max(x)));
    let (min_y, max_y) = changed
        .iter()
        .fold((u32::MAX, 0), |(lo, hi), &(_, y)| (lo.min(y), hi.max(y)));
    let centre_x = (min_x + max_x) as f64 / 2.0;
    let centre_y = (min_y + max_y) as f64 / 2.0;
    assert!((centre_x - 50.0).abs() <= 8.0, "centre x {centre_x}");
    assert!((centre_y - 70.0).abs() <= 8.0, "centre y {centre_y}");

    std::fs::remove_dir_all(&dir).ok();
}
