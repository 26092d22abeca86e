//! Definitions command handler

use anyhow::Result;

use super::CommandContext;

/// Handle the `definitions` command
pub async fn run_definitions(ctx: &CommandContext) -> Result<()> {
    let publisher = ctx.publisher();
    let definitions = publisher.definitions();

    if definitions.is_empty() {
        println!("[]");
        eprintln!("Hub is not installed; run `hubctl install` to get definitions.");
        return Ok(());
    }

    println!("{}", serde_json::to_string_pretty(&definitions)?);
    Ok(())
}
