//! refresh command - regenerate gitweb/daemon artifacts from config

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::core::config::Config;
use crate::export;
use crate::ui::output;

/// Regenerate descriptions, the project list, and daemon export markers.
///
/// Useful after editing the config without pushing anything: the same
/// regeneration provisioning performs, on demand.
pub fn refresh(ctx: &Context) -> Result<()> {
    let config =
        Config::load(ctx.config_path.as_deref()).context("failed to load configuration")?;

    export::set_descriptions(&config).context("failed to write repository descriptions")?;
    export::generate_project_list(&config, &config.project_list_path())
        .context("failed to generate project list")?;
    export::set_export_ok(&config).context("failed to update daemon export markers")?;

    output::info(
        format!(
            "regenerated artifacts under {}",
            config.generated_files_dir.display()
        ),
        ctx.verbosity,
    );
    Ok(())
}
