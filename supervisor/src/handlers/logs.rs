//! Logs command handler

use anyhow::Result;

use super::CommandContext;

/// Handle the `logs` command
pub async fn run_logs(ctx: &CommandContext, lines: usize) -> Result<()> {
    let log_file = &ctx.settings.layout.log_file;

    if !log_file.exists() {
        println!("No hub logs found.");
        println!("Expected location: {:?}", log_file);
        return Ok(());
    }

    println!("=== Hub log ({:?}) ===\n", log_file);
    let content = tokio::fs::read_to_string(log_file).await?;
    let log_lines: Vec<&str> = content.lines().collect();

    let display_lines = if lines == 0 {
        &log_lines[..]
    } else {
        let start = log_lines.len().saturating_sub(lines);
        &log_lines[start..]
    };

    for line in display_lines {
        println!("{}", line);
    }

    Ok(())
}
