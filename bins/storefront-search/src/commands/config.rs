//! Config command - show the effective configuration

use super::Context;
use anyhow::Result;
use storefront_cli::output::Status;
use storefront_cli::OutputFormat;
use storefront_core::error::exit_codes;

/// Print the configuration after file lookup and environment overrides
pub fn run(ctx: &Context) -> Result<i32> {
    // Surface invalid [search] values here rather than on the first search.
    let options = ctx.config.schema.search.to_options()?;

    match ctx.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "path": ctx.config.path,
                "config": ctx.config.schema,
                "options": options,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            match &ctx.config.path {
                Some(path) => Status::info(&format!("Loaded {}", path.display())),
                None => Status::info("No config file found, using defaults"),
            }
            println!();
            print!("{}", ctx.config.to_toml()?);
        }
    }

    Ok(exit_codes::SUCCESS)
}
