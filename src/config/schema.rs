//! Manifest schema definitions.
//!
//! The manifest is the on-disk source for distributors and module
//! descriptors. All types derive Serde traits for deserialization from TOML.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root manifest: the distributors to bring up and the modules installed
/// for them.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Manifest {
    /// Distributor definitions.
    #[serde(rename = "distributor")]
    pub distributors: Vec<DistributorConfig>,

    /// Installed module versions, shared across distributors.
    #[serde(rename = "module")]
    pub modules: Vec<ModuleConfig>,
}

/// One distributor: an isolated site instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DistributorConfig {
    /// Unique distributor identifier.
    pub id: String,

    /// Enabled modules: module code → version selector expression.
    #[serde(default)]
    pub modules: BTreeMap<String, String>,
}

/// One installed module version.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModuleConfig {
    /// Module code, `vendor/name`.
    pub code: String,

    /// Version triple, e.g. `"1.2.0"`.
    pub version: String,

    /// URL alias for lazy routes; defaults to the name part of the code.
    pub alias: Option<String>,

    /// Dependencies: module code → version range expression.
    #[serde(default)]
    pub requires: BTreeMap<String, String>,

    /// Route declarations, in registration order.
    #[serde(default, rename = "route")]
    pub routes: Vec<RouteConfig>,

    /// API commands: name → handler symbol.
    #[serde(default)]
    pub api: BTreeMap<String, String>,

    /// Bridge commands (cross-distributor): name → handler symbol.
    #[serde(default)]
    pub bridge: BTreeMap<String, String>,
}

/// Route kind selector in the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteKindConfig {
    Lazy,
    Absolute,
    Shadow,
}

/// One route declaration.
///
/// Lazy and absolute routes name a `handler` symbol of the declaring
/// module. Shadow routes name a `target_module` and optionally either a
/// `target_pattern` (bind to that module's declared route) or a `handler`
/// (bind straight to that module's handler symbol); with neither, the
/// shadow forwards the path remainder to the target module's lazy routes.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    pub kind: RouteKindConfig,

    /// Pattern source in the token grammar.
    pub pattern: String,

    #[serde(default)]
    pub handler: Option<String>,

    #[serde(default)]
    pub target_module: Option<String>,

    #[serde(default)]
    pub target_pattern: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_manifest_parses() {
        let manifest: Manifest = toml::from_str(
            r#"
            [[distributor]]
            id = "main"
            [distributor.modules]
            "acme/core" = "^1.0.0"

            [[module]]
            code = "acme/core"
            version = "1.2.0"

            [[module.route]]
            kind = "absolute"
            pattern = "/"
            handler = "home"
            "#,
        )
        .unwrap();

        assert_eq!(manifest.distributors.len(), 1);
        assert_eq!(manifest.distributors[0].id, "main");
        assert_eq!(manifest.modules.len(), 1);
        assert_eq!(manifest.modules[0].routes.len(), 1);
        assert_eq!(manifest.modules[0].routes[0].kind, RouteKindConfig::Absolute);
    }

    #[test]
    fn test_shadow_route_fields() {
        let manifest: Manifest = toml::from_str(
            r#"
            [[module]]
            code = "acme/legacy"
            version = "1.0.0"

            [[module.route]]
            kind = "shadow"
            pattern = "/legacy"
            target_module = "acme/blog"
            "#,
        )
        .unwrap();

        let route = &manifest.modules[0].routes[0];
        assert_eq!(route.kind, RouteKindConfig::Shadow);
        assert_eq!(route.target_module.as_deref(), Some("acme/blog"));
        assert!(route.target_pattern.is_none());
    }

    #[test]
    fn test_empty_manifest_defaults() {
        let manifest: Manifest = toml::from_str("").unwrap();
        assert!(manifest.distributors.is_empty());
        assert!(manifest.modules.is_empty());
    }
}
