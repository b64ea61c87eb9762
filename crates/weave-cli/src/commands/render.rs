use std::path::Path;

use anyhow::{Context, Result};

use weave_core::config::WeaveConfig;
use weave_core::store::DirectoryStore;
use weave_core::{Interpolator, VariableBindings};

use crate::output;
use crate::RenderArgs;

/// Expand template references and bind variables in `args.input`.
///
/// Variables are layered: config defaults, then `--vars`, then `--vars-file`.
/// The expanded text goes to `--output` or stdout; warnings and statistics go
/// to stderr.
pub fn run(config_path: Option<&Path>, args: &RenderArgs) -> Result<()> {
    if !args.input.is_file() {
        anyhow::bail!("input file '{}' not found", args.input.display());
    }

    let config = WeaveConfig::discover(config_path, Path::new("."))?;
    let template_dir =
        super::template_dir_for(&args.input, args.template_dir.as_deref(), config.template_dir.as_deref());
    let max_depth = args.max_depth.unwrap_or(config.max_depth);

    let mut bindings = config.bindings();
    bindings.merge(VariableBindings::parse_assignments(&args.vars));
    if let Some(path) = &args.vars_file {
        bindings.merge(VariableBindings::from_file(path)?);
    }

    let content = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    tracing::info!(
        "rendering {} with templates from {}",
        args.input.display(),
        template_dir.display()
    );
    let interpolator = Interpolator::new(DirectoryStore::new(&template_dir)).with_max_depth(max_depth);
    let result = interpolator.interpolate(&content, &bindings)?;

    for warning in &result.warnings {
        output::print_warning(&warning.to_string());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if let Some(path) = &args.output {
        std::fs::write(path, &result.content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        output::print_success(&format!("Output written to: {}", path.display()));
    } else {
        println!("{}", result.content);
    }

    if args.stats {
        let stats = &result.stats;
        output::print_header("Interpolation statistics");
        output::print_key_value("Original length", &format!("{} chars", stats.original_length));
        output::print_key_value("Final length", &format!("{} chars", stats.final_length));
        output::print_key_value("Templates used", &stats.templates_used.to_string());
        if !result.used_templates.is_empty() {
            let names: Vec<&str> = result.used_templates.iter().map(String::as_str).collect();
            output::print_key_value("  -", &names.join(", "));
        }
        output::print_key_value("Variables provided", &stats.variables_provided.to_string());
        if !bindings.is_empty() {
            output::print_key_value("  -", &bindings.keys().collect::<Vec<_>>().join(", "));
        }
        output::print_key_value("Variables resolved", &stats.variables_resolved.to_string());
        if !result.unresolved_variables.is_empty() {
            output::print_key_value("Unresolved", &result.unresolved_variables.join(", "));
        }
    }

    tracing::debug!("template directory: {}", template_dir.display());
    tracing::debug!("max depth: {max_depth}");
    Ok(())
}
