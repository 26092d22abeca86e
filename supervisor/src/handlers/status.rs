//! Status command handler
//!
//! Shows hub state plus prerequisite checks.

use anyhow::Result;

use super::CommandContext;

/// Handle the `status` command
pub async fn run_status(ctx: &CommandContext) -> Result<()> {
    println!("=== MCP Hub Status ===\n");

    let summary = ctx.supervisor.status().await;
    match summary.endpoint {
        Some(endpoint) => {
            println!("Hub: {} on {}", summary.state, endpoint);
            if let Some(docs) = summary.docs_url {
                println!("  - Docs: {}", docs);
            }
        }
        None => println!("Hub: {}", summary.state),
    }

    let python_ok = ctx.prereqs.has_interpreter();
    println!("Python: {}", status(python_ok));
    if !python_ok {
        println!("  Install from https://www.python.org/downloads/");
    }

    let docker_ok = ctx.prereqs.has_container_runtime();
    println!("Docker: {}", status(docker_ok));
    if !docker_ok {
        println!("  Install from https://docs.docker.com/get-docker/");
    }

    Ok(())
}

fn status(passed: bool) -> &'static str {
    if passed {
        "✓"
    } else {
        "✗"
    }
}
