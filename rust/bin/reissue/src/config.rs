//! Client-side context management.
//!
//! Reads/writes `~/.reissue/config.toml`.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use reissue_client::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};

/// Environment variable that overrides the context's server URL.
pub const SERVER_ENV: &str = "REISSUE_SERVER";

/// A named backend plus the student it is used for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    pub name: String,

    /// Server URL (e.g. "http://localhost:5000").
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub server: String,

    /// Default register number for dashboard commands.
    #[serde(
        rename = "registerNumber",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub register_number: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Name of the currently active context.
    #[serde(rename = "current-context", default)]
    pub current_context: String,

    #[serde(default)]
    pub contexts: Vec<Context>,
}

impl CliConfig {
    /// Default config file path: ~/.reissue/config.toml.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// Load config from disk, or return default if the file doesn't exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    pub fn current(&self) -> Option<&Context> {
        self.contexts.iter().find(|c| c.name == self.current_context)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Context> {
        self.contexts.iter_mut().find(|c| c.name == name)
    }

    /// Add or replace a context by name.
    pub fn upsert_context(&mut self, ctx: Context) {
        if let Some(existing) = self.get_mut(&ctx.name) {
            *existing = ctx;
        } else {
            self.contexts.push(ctx);
        }
    }

    /// Remove a context by name. Returns true if it was found.
    pub fn remove_context(&mut self, name: &str) -> bool {
        let len = self.contexts.len();
        self.contexts.retain(|c| c.name != name);
        if self.current_context == name {
            self.current_context = String::new();
        }
        self.contexts.len() < len
    }

    /// Server URL by precedence: flag, environment, current context, default.
    pub fn resolve_server(&self, flag: Option<&str>, env: Option<&str>) -> String {
        flag.filter(|s| !s.is_empty())
            .or_else(|| env.filter(|s| !s.is_empty()))
            .or_else(|| {
                self.current()
                    .map(|c| c.server.as_str())
                    .filter(|s| !s.is_empty())
            })
            .unwrap_or(DEFAULT_BASE_URL)
            .to_string()
    }

    /// Register number from the argument, else from the current context.
    pub fn resolve_register_number(&self, arg: Option<&str>) -> anyhow::Result<String> {
        if let Some(id) = arg.filter(|s| !s.is_empty()) {
            return Ok(id.to_string());
        }
        match self.current() {
            Some(c) if !c.register_number.is_empty() => Ok(c.register_number.clone()),
            Some(c) => anyhow::bail!(
                "No register number given and context \"{}\" has none. Run `reissue context set {} --register-number <id>`.",
                c.name,
                c.name
            ),
            None => anyhow::bail!("No register number given and no current context."),
        }
    }
}

/// Return the reissue config directory (~/.reissue).
fn dirs_path() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".reissue")
}
