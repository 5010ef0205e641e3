//! Registry construction for the CLI
//!
//! The CLI starts from the built-in IPython magic extractors and layers an
//! optional user manifest on top. The manifest lives at
//! `.config/graft/extractors.json` relative to the working directory unless
//! an explicit path is given.

use eyre::Result;
use graft_core::{ExtractorManifest, ExtractorRegistry, ManifestWarning, magics};
use std::path::{Path, PathBuf};

/// Default manifest location, relative to the working directory.
pub const DEFAULT_MANIFEST_PATH: &str = ".config/graft/extractors.json";

/// Resolve which manifest to load, if any.
///
/// An explicit path is always used (and failing to read it is an error);
/// otherwise the default location is used only when it exists.
pub fn resolve_manifest_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = PathBuf::from(DEFAULT_MANIFEST_PATH);
            default.exists().then_some(default)
        }
    }
}

/// Build the registry for a run: built-ins (unless disabled) plus the
/// manifest's extractors, appended after the built-ins so user rules never
/// preempt stock ones for a claimed span.
pub fn build_registry(
    manifest_path: Option<&Path>,
    builtins: bool,
) -> Result<(ExtractorRegistry, Vec<ManifestWarning>)> {
    let mut registry = if builtins {
        magics::default_registry()
    } else {
        ExtractorRegistry::new()
    };

    let mut warnings = Vec::new();
    if let Some(path) = manifest_path {
        let manifest = ExtractorManifest::load(path)?;
        warnings = manifest.register_into(&mut registry);
    }

    Ok((registry, warnings))
}

/// Infer the host language tag from a file extension.
pub fn language_for_extension(extension: &str) -> Option<&'static str> {
    match extension {
        "py" => Some("python"),
        "rs" => Some("rust"),
        "js" => Some("javascript"),
        "ts" => Some("typescript"),
        "md" => Some("markdown"),
        "rb" => Some("ruby"),
        "jl" => Some("julia"),
        "r" | "R" => Some("r"),
        _ => None,
    }
}
