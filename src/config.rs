use std::{
    fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::{
    data::{DirectiveConfig, ResolveOptions, SymbolTable},
    file_scanner::is_glob_pattern,
};

pub const CONFIG_FILE_NAME: &str = ".ifdefrc.json";

/// A symbol must be a plain JavaScript identifier to be usable in an expression.
static SYMBOL_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("valid regex"));

pub const DEFAULT_EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "cjs", "ts", "tsx", "mts", "cts"];

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Values visible to `#if` / `#elif` expressions.
    #[serde(default)]
    pub symbols: SymbolTable,
    /// Custom directive switches; `false` strips the line after the directive.
    #[serde(default)]
    pub directives: DirectiveConfig,
    #[serde(default = "default_includes")]
    pub includes: Vec<String>,
    #[serde(default)]
    pub ignores: Vec<String>,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default = "default_out_dir")]
    pub out_dir: String,
    #[serde(default = "default_source_root")]
    pub source_root: String,
}

fn default_includes() -> Vec<String> {
    vec!["src".to_string()]
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect()
}

fn default_out_dir() -> String {
    "./dist".to_string()
}

fn default_source_root() -> String {
    "./".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            symbols: SymbolTable::new(),
            directives: DirectiveConfig::new(),
            includes: default_includes(),
            ignores: Vec::new(),
            extensions: default_extensions(),
            out_dir: default_out_dir(),
            source_root: default_source_root(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if a glob pattern in `ignores` or `includes` is invalid,
    /// or if an extension is empty or starts with a dot.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        for pattern in &self.includes {
            if is_glob_pattern(pattern) {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'includes': \"{}\"", pattern)
                })?;
            }
        }

        for ext in &self.extensions {
            if ext.is_empty() || ext.starts_with('.') {
                bail!(
                    "Invalid entry in 'extensions': \"{}\" (use e.g. \"js\", without the dot)",
                    ext
                );
            }
        }

        Ok(())
    }

    /// Symbols and directive switches in the form the resolver takes.
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions::new(self.symbols.clone(), self.directives.clone())
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}

/// Parse a `-D` argument: `NAME=VALUE` or a bare `NAME` meaning `true`.
///
/// The value is read as JSON (`3`, `false`, `["a"]`, `"quoted"`) and falls
/// back to a plain string when it isn't valid JSON.
pub fn parse_define(raw: &str) -> Result<(String, serde_json::Value)> {
    let (name, value) = match raw.split_once('=') {
        Some((name, value)) => (
            name.trim(),
            serde_json::from_str(value.trim())
                .unwrap_or_else(|_| serde_json::Value::String(value.to_string())),
        ),
        None => (raw.trim(), serde_json::Value::Bool(true)),
    };
    if name.is_empty() {
        bail!("Invalid symbol definition \"{}\": missing name", raw);
    }
    if !SYMBOL_NAME.is_match(name) {
        bail!(
            "Invalid symbol definition \"{}\": \"{}\" is not an identifier",
            raw,
            name
        );
    }
    Ok((name.to_string(), value))
}
