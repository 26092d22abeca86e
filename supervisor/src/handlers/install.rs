//! Install command handler

use anyhow::Result;

use super::CommandContext;

/// Handle the `install` command
pub async fn run_install(ctx: &CommandContext) -> Result<()> {
    println!("Installing hub to {:?}...", ctx.settings.layout.root);

    ctx.installer.install()?;

    println!("Hub installed successfully.");
    println!("  Entry point: {:?}", ctx.settings.layout.entry_point);
    println!("  Manifest: {:?}", ctx.settings.layout.manifest);
    Ok(())
}
