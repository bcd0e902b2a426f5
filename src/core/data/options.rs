use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Symbol name to arbitrary JSON value, visible to `#if`/`#elif` expressions.
pub type SymbolTable = Map<String, Value>;

/// Custom directive name to enabled flag. A disabled directive removes the line after it.
pub type DirectiveConfig = BTreeMap<String, bool>;

/// Look up a custom directive flag. Names compare case-insensitively.
pub fn directive_flag(directives: &DirectiveConfig, name: &str) -> Option<bool> {
    directives.get(name).copied().or_else(|| {
        directives
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, enabled)| *enabled)
    })
}

/// Caller-supplied inputs for one resolution pass. Never mutated during the pass.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveOptions {
    #[serde(default)]
    pub symbols: SymbolTable,
    #[serde(default)]
    pub directives: DirectiveConfig,
}

impl ResolveOptions {
    pub fn new(symbols: SymbolTable, directives: DirectiveConfig) -> Self {
        Self {
            symbols,
            directives,
        }
    }

    /// Add or replace a symbol.
    pub fn with_symbol(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.symbols.insert(name.into(), value.into());
        self
    }

    /// Add or replace a custom directive flag.
    pub fn with_directive(mut self, name: impl Into<String>, enabled: bool) -> Self {
        self.directives.insert(name.into(), enabled);
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_deserialize_missing_fields_default_to_empty() {
        let options: ResolveOptions = serde_json::from_str("{}").unwrap();
        assert!(options.symbols.is_empty());
        assert!(options.directives.is_empty());
    }

    #[test]
    fn test_builder_helpers() {
        let options = ResolveOptions::default()
            .with_symbol("IE", 8)
            .with_directive("debug", false);
        assert_eq!(options.symbols.get("IE"), Some(&json!(8)));
        assert_eq!(options.directives.get("debug"), Some(&false));
    }

    #[test]
    fn test_directive_flag_ignores_case() {
        let directives = DirectiveConfig::from([("Debug".to_string(), false)]);
        assert_eq!(directive_flag(&directives, "debug"), Some(false));
        assert_eq!(directive_flag(&directives, "DEBUG"), Some(false));
        assert_eq!(directive_flag(&directives, "warning"), None);
    }
}
