//! Reading feature files from disk.
//!
//! Files are opened through a capability [`Dir`] so the loader only ever
//! touches the directory it was handed.

use std::path::Path;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};

use crate::config::Config;
use crate::error::{LoadError, ParseError};
use crate::model::Feature;
use crate::parser::parse_lines;

/// Read and parse the feature file at `path`.
///
/// # Errors
/// Returns [`LoadError::InvalidPath`] when `path` has no file name,
/// [`LoadError::Io`] when the file cannot be read and [`LoadError::Parse`]
/// when its contents are not a valid document.
pub fn load_feature(path: &Utf8Path, config: &Config) -> Result<Feature, LoadError> {
    let file_name = path.file_name().ok_or_else(|| LoadError::InvalidPath {
        path: path.to_owned(),
    })?;
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|source| {
        LoadError::Io {
            path: path.to_owned(),
            source,
        }
    })?;
    load_feature_from(&dir, Utf8Path::new(file_name), config).map_err(|err| match err {
        LoadError::Io { source, .. } => LoadError::Io {
            path: path.to_owned(),
            source,
        },
        LoadError::Parse { source, .. } => LoadError::Parse {
            path: path.to_owned(),
            source,
        },
        other => other,
    })
}

/// Read and parse `path` relative to an already opened directory.
///
/// # Errors
/// As for [`load_feature`].
pub fn load_feature_from(dir: &Dir, path: &Utf8Path, config: &Config) -> Result<Feature, LoadError> {
    let text = dir.read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_owned(),
        source,
    })?;
    log::debug!("loaded {path} ({} bytes)", text.len());
    let parse_error = |source| LoadError::Parse {
        path: path.to_owned(),
        source,
    };
    parse_lines(text.lines(), config)
        .map_err(parse_error)?
        .into_iter()
        .next()
        .ok_or_else(|| parse_error(ParseError::MissingFeature))
}

/// [`load_feature`] for paths that may not be UTF-8.
///
/// # Errors
/// Returns [`LoadError::NonUtf8Path`] for non-UTF-8 paths, otherwise as for
/// [`load_feature`].
pub fn load_feature_path(path: &Path, config: &Config) -> Result<Feature, LoadError> {
    let utf8 = Utf8Path::from_path(path).ok_or_else(|| LoadError::NonUtf8Path {
        path: path.to_string_lossy().into_owned(),
    })?;
    load_feature(utf8, config)
}
