//! Context management commands.

use std::path::Path;

use anyhow::Result;

use crate::config::{CliConfig, Context};

/// Create (or replace) a context. The first context becomes current.
pub fn create(
    name: &str,
    server: Option<&str>,
    register_number: Option<&str>,
    config_path: &Path,
) -> Result<()> {
    if name.trim().is_empty() {
        anyhow::bail!("Context name cannot be empty.");
    }

    let mut config = CliConfig::load(config_path)?;
    config.upsert_context(Context {
        name: name.to_string(),
        server: server.unwrap_or_default().to_string(),
        register_number: register_number.unwrap_or_default().to_string(),
    });
    if config.current_context.is_empty() {
        config.current_context = name.to_string();
    }
    config.save(config_path)?;

    println!("Context \"{}\" created.", name);
    Ok(())
}

pub fn list(config_path: &Path) -> Result<()> {
    let config = CliConfig::load(config_path)?;

    if config.contexts.is_empty() {
        println!("No contexts configured.");
        println!("Run: reissue context create <name> --server <url>");
        return Ok(());
    }

    println!("{:2} {:20} {:40} {:16}", "", "NAME", "SERVER", "REGISTER NUMBER");
    for ctx in &config.contexts {
        let marker = if ctx.name == config.current_context {
            "*"
        } else {
            " "
        };
        let server = if ctx.server.is_empty() { "-" } else { &ctx.server };
        let id = if ctx.register_number.is_empty() {
            "-"
        } else {
            &ctx.register_number
        };
        println!("{:2} {:20} {:40} {:16}", marker, ctx.name, server, id);
    }

    Ok(())
}

pub fn use_context(name: &str, config_path: &Path) -> Result<()> {
    let mut config = CliConfig::load(config_path)?;

    if !config.contexts.iter().any(|c| c.name == name) {
        anyhow::bail!(
            "Context \"{}\" not found. Run `reissue context list` to see available contexts.",
            name
        );
    }

    config.current_context = name.to_string();
    config.save(config_path)?;
    println!("Switched to context \"{}\".", name);
    Ok(())
}

pub fn set(
    name: &str,
    server: Option<&str>,
    register_number: Option<&str>,
    config_path: &Path,
) -> Result<()> {
    let mut config = CliConfig::load(config_path)?;

    let ctx = config
        .get_mut(name)
        .ok_or_else(|| anyhow::anyhow!("Context \"{}\" not found.", name))?;

    if let Some(s) = server {
        ctx.server = s.to_string();
    }
    if let Some(id) = register_number {
        ctx.register_number = id.to_string();
    }

    config.save(config_path)?;
    println!("Context \"{}\" updated.", name);
    Ok(())
}

pub fn delete(name: &str, config_path: &Path) -> Result<()> {
    let mut config = CliConfig::load(config_path)?;

    if !config.remove_context(name) {
        anyhow::bail!("Context \"{}\" not found.", name);
    }

    config.save(config_path)?;
    println!("Context \"{}\" deleted.", name);
    Ok(())
}
