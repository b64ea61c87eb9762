//! CLI command implementations for weave.
//!
//! Each module corresponds to a subcommand (`weave <command>`).

pub mod check;
pub mod render;

use std::path::{Path, PathBuf};

/// Template directory precedence: flag, then config, then the input's directory.
pub(crate) fn template_dir_for(input: &Path, flag: Option<&Path>, configured: Option<&Path>) -> PathBuf {
    flag.or(configured)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| match input.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        })
}
