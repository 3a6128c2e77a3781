//! Font loading for the booklet renderer.
//!
//! The booklet uses one font family throughout.  Fonts are looked up in the
//! configured directory first, then the `SHOW_BOOKLET_FONTS_DIR` environment
//! variable, and finally the bundled `assets/fonts` directory.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::Error;
use genpdf::fonts::{self, FontData, FontFamily};

/// Name of the bundled font family.
pub const DEFAULT_FONT_FAMILY_NAME: &str = "Roboto";

/// Environment variable overriding the font directory.
pub const FONTS_DIR_ENV: &str = "SHOW_BOOKLET_FONTS_DIR";

const FONT_FILES: &[&str] = &[
    "Roboto-Regular.ttf",
    "Roboto-Bold.ttf",
    "Roboto-Italic.ttf",
    "Roboto-BoldItalic.ttf",
];

fn bundled_font_directory() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts")
}

fn resolve_directory(configured: Option<&Path>) -> PathBuf {
    if let Some(dir) = configured {
        return dir.to_path_buf();
    }
    if let Some(dir) = env::var_os(FONTS_DIR_ENV) {
        return PathBuf::from(dir);
    }
    bundled_font_directory()
}

fn ensure_required_fonts_present(path: &Path) -> Result<(), Error> {
    let missing: Vec<_> = FONT_FILES
        .iter()
        .map(|name| path.join(name))
        .filter(|candidate| !candidate.is_file())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        let display_list = missing
            .iter()
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");

        Err(Error::new(
            format!(
                "Missing font files: {}. Set {} or populate assets/fonts.",
                display_list, FONTS_DIR_ENV
            ),
            io::Error::new(io::ErrorKind::NotFound, "booklet fonts missing"),
        ))
    }
}

/// Loads the booklet font family, honoring the configured directory override.
pub fn booklet_font_family(configured: Option<&Path>) -> Result<FontFamily<FontData>, Error> {
    let directory = resolve_directory(configured);
    ensure_required_fonts_present(&directory)?;

    fonts::from_files(&directory, DEFAULT_FONT_FAMILY_NAME, None).map_err(|err| {
        Error::new(
            format!(
                "Failed to load font family '{}' from {}: {}",
                DEFAULT_FONT_FAMILY_NAME,
                directory.display(),
                err
            ),
            io::Error::new(io::ErrorKind::Other, err.to_string()),
        )
    })
}

/// Indicates whether all font files needed for rendering are present.
pub fn fonts_available(configured: Option<&Path>) -> bool {
    let directory = resolve_directory(configured);
    FONT_FILES
        .iter()
        .map(|name| directory.join(name))
        .all(|path| path.is_file())
}
