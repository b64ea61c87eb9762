use std::path::{Path, PathBuf};

use anyhow::Result;

use weave_core::check::check_references;
use weave_core::config::WeaveConfig;
use weave_core::store::DirectoryStore;

use crate::output;

/// Check that every template referenced by each input exists.
///
/// Fails if any input has a missing reference. Fragments are not expanded,
/// so only references written directly in the inputs are checked.
pub fn run(config_path: Option<&Path>, inputs: &[PathBuf], template_dir: Option<&Path>) -> Result<()> {
    let config = WeaveConfig::discover(config_path, Path::new("."))?;
    let mut all_ok = true;

    for input in inputs {
        output::print_header(&format!("weave check {}", input.display()));

        let content = match std::fs::read_to_string(input) {
            Ok(content) => content,
            Err(e) => {
                output::print_error(&format!("cannot read file: {e}"));
                all_ok = false;
                continue;
            }
        };

        let dir = super::template_dir_for(input, template_dir, config.template_dir.as_deref());
        let store = DirectoryStore::new(&dir);
        let report = check_references(&store, &content);

        if report.templates.is_empty() {
            output::print_success("No template references found");
        }
        for missing in &report.missing {
            output::print_error(&format!(
                "line {}: template '{}' not found ({})",
                missing.line, missing.name, missing.reference
            ));
            output::print_key_value("Searched in", &dir.display().to_string());
        }
        if report.is_ok() && !report.templates.is_empty() {
            output::print_success(&format!(
                "{} template reference(s) resolved",
                report.templates.len()
            ));
        }
        if !report.variables.is_empty() {
            let names: Vec<&str> = report.variables.iter().map(String::as_str).collect();
            output::print_key_value(
                &format!("{} variable reference(s)", names.len()),
                &names.join(", "),
            );
        }

        all_ok &= report.is_ok();
    }

    if !all_ok {
        anyhow::bail!("some template references are invalid");
    }
    output::print_success("All references are valid");
    Ok(())
}
