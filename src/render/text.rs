// src/render/text.rs

//! Font loading, text measurement and greedy word wrapping.

use std::fs;
use std::path::Path;

use rusttype::{Font, Scale, point};

use crate::error::{AppError, Result};

/// DejaVu Sans, shipped with the crate so rendering never depends on system fonts.
static EMBEDDED_FONT: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

/// Pixel sizes for each text role.
pub mod sizes {
    pub const TITLE: f32 = 32.0;
    pub const SUBTITLE: f32 = 16.0;
    pub const NAME: f32 = 24.0;
    pub const HEADING: f32 = 18.0;
    pub const DATE: f32 = 16.0;
    pub const BODY: f32 = 16.0;
    pub const SMALL: f32 = 14.0;
}

/// A TrueType face used for every text role.
pub struct Face {
    font: Font<'static>,
}

impl Face {
    /// The face compiled into the binary.
    pub fn embedded() -> Result<Self> {
        let font = Font::try_from_bytes(EMBEDDED_FONT)
            .ok_or_else(|| AppError::render("embedded font is not a valid TrueType face"))?;
        Ok(Self { font })
    }

    /// Load a face from a TrueType file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let font = Font::try_from_vec(bytes).ok_or_else(|| {
            AppError::render(format!("{} is not a valid TrueType face", path.display()))
        })?;
        Ok(Self { font })
    }

    /// Load `path` if given, falling back to the embedded face on failure.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                log::info!("Loading font from: {}", path.display());
                Self::from_file(path).or_else(|e| {
                    log::warn!("Failed to load font {}: {}; using embedded font", path.display(), e);
                    Self::embedded()
                })
            }
            None => Self::embedded(),
        }
    }

    pub(crate) fn font(&self) -> &Font<'static> {
        &self.font
    }

    /// Distance from the top of a line box to its baseline.
    pub fn ascent(&self, px: f32) -> f32 {
        self.font.v_metrics(Scale::uniform(px)).ascent
    }

    /// Horizontal advance of `text` at `px`, kerning included.
    pub fn measure(&self, px: f32, text: &str) -> f32 {
        let scale = Scale::uniform(px);
        self.font
            .layout(text, scale, point(0.0, 0.0))
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
    }
}

/// Greedy word wrap.
///
/// Words are added to the current line while `measure(line) <= max_width`.
/// A word that does not fit starts the next line; a word wider than
/// `max_width` on its own is emitted unbroken. Whitespace runs collapse.
pub fn wrap_text(text: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        let candidate = format!("{current} {word}");
        if measure(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One unit per character.
    fn chars(s: &str) -> f32 {
        s.chars().count() as f32
    }

    #[test]
    fn test_short_text_is_one_line() {
        assert_eq!(wrap_text("JOHN DOE", 40.0, chars), vec!["JOHN DOE"]);
    }

    #[test]
    fn test_empty_text_has_no_lines() {
        assert!(wrap_text("   ", 10.0, chars).is_empty());
    }

    #[test]
    fn test_wraps_at_width() {
        assert_eq!(
            wrap_text("the quick brown fox jumps", 10.0, chars),
            vec!["the quick", "brown fox", "jumps"]
        );
    }

    #[test]
    fn test_overlong_word_is_kept_whole() {
        assert_eq!(
            wrap_text("a extraordinarily b", 5.0, chars),
            vec!["a", "extraordinarily", "b"]
        );
    }

    #[test]
    fn test_wrap_preserves_words_and_order() {
        let text = "  Should be considered\tarmed and\n\ndangerous, and an escape risk. ";
        for width in [1.0, 8.0, 15.0, 30.0, 200.0] {
            let lines = wrap_text(text, width, chars);
            assert_eq!(
                lines.join(" "),
                text.split_whitespace().collect::<Vec<_>>().join(" ")
            );
            for line in &lines {
                assert!(chars(line) <= width || !line.contains(' '));
            }
        }
    }

    #[test]
    fn test_embedded_face_measures() {
        let face = Face::embedded().unwrap();
        let narrow = face.measure(sizes::BODY, "il");
        let wide = face.measure(sizes::BODY, "WWWWWW");
        assert!(narrow > 0.0);
        assert!(wide > narrow);
        assert_eq!(face.measure(sizes::BODY, ""), 0.0);
        assert!(face.ascent(sizes::TITLE) > face.ascent(sizes::SMALL));
    }

    #[test]
    fn test_real_font_wrap_is_deterministic() {
        let face = Face::embedded().unwrap();
        let text = "The FBI is offering a reward of up to $10,000 for information leading to an arrest.";
        let measure = |s: &str| face.measure(sizes::BODY, s);
        let first = wrap_text(text, 200.0, measure);
        let second = wrap_text(text, 200.0, measure);
        assert_eq!(first, second);
        assert!(first.len() > 1);
        for line in &first {
            assert!(face.measure(sizes::BODY, line) <= 200.0);
        }
    }

    #[test]
    fn test_missing_font_file_falls_back() {
        let face = Face::load(Some(Path::new("no/such/font.ttf"))).unwrap();
        assert!(face.measure(sizes::BODY, "x") > 0.0);
    }
}
