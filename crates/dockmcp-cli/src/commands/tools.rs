//! Tools command implementation

use super::build_registry;
use anyhow::Result;
use dockmcp_core::{DockmcpConfig, ToolRegistry};
use std::io::Write;

/// Print every tool with its description, in advertisement order
pub fn show_tools(config: &DockmcpConfig) -> Result<()> {
    let (_, registry) = build_registry(config)?;
    let stdout = std::io::stdout();
    write_tools(&registry, &mut stdout.lock())?;
    Ok(())
}

fn write_tools<W: Write>(registry: &ToolRegistry, out: &mut W) -> std::io::Result<()> {
    let width = registry
        .all_tools()
        .iter()
        .map(|t| t.name().len())
        .max()
        .unwrap_or(0);

    for tool in registry.all_tools() {
        let marker = if tool.is_read_only() { " (read-only)" } else { "" };
        writeln!(
            out,
            "{:width$}  {}{}",
            tool.name(),
            tool.description(),
            marker,
            width = width
        )?;
    }
    writeln!(out)?;
    writeln!(out, "Total tools available: {}", registry.len())
}
