//! Start/stop command handlers

use anyhow::Result;

use super::CommandContext;

/// Handle the `start` command
pub async fn run_start(ctx: &CommandContext) -> Result<()> {
    if ctx.supervisor.is_running().await {
        println!("Hub is already running on {}", ctx.settings.base_url());
        return Ok(());
    }

    println!("Starting hub...");
    ctx.supervisor.start().await?;

    println!("Hub running on {}", ctx.settings.base_url());
    println!("  MCP endpoint: {}", ctx.settings.mcp_url());
    println!("  Log: {:?}", ctx.settings.layout.log_file);
    Ok(())
}

/// Handle the `stop` command
pub async fn run_stop(ctx: &CommandContext) -> Result<()> {
    if !ctx.supervisor.is_running().await {
        println!("Hub is not running.");
        return Ok(());
    }

    ctx.supervisor.stop().await?;
    println!("Hub stopped.");
    Ok(())
}
