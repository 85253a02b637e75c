//! Field data fixtures compiled into the binary.

use include_dir::{Dir, include_dir};

use crate::MapsError;

static BUNDLED_DATA: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/data");

/// Returns the contents of a bundled fixture.
///
/// # Errors
///
/// Returns [`MapsError::NotFound`] if no bundled file exists at `path` or
/// the file is not UTF-8.
pub fn read(path: &str) -> Result<&'static str, MapsError> {
    BUNDLED_DATA
        .get_file(path.trim_start_matches('/'))
        .and_then(include_dir::File::contents_utf8)
        .ok_or_else(|| MapsError::NotFound {
            path: path.to_string(),
        })
}

/// Whether a bundled fixture exists at `path`.
#[must_use]
pub fn exists(path: &str) -> bool {
    read(path).is_ok()
}
