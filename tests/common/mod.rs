//! Shared utilities for integration testing.

use tessera::config::{compile_manifest, CompiledManifest, Manifest};
use tessera::distributor::DistributorRegistry;

/// Parse a TOML manifest and compile it to descriptors.
pub fn compiled(toml_src: &str) -> CompiledManifest {
    let manifest: Manifest = toml::from_str(toml_src).expect("manifest should parse");
    compile_manifest(&manifest).expect("manifest should validate")
}

/// Boot every distributor of a manifest into a fresh registry.
#[allow(dead_code)]
pub fn boot_registry(toml_src: &str) -> DistributorRegistry {
    let compiled = compiled(toml_src);
    let registry = DistributorRegistry::new();
    for (id, enabled) in &compiled.distributors {
        registry
            .boot(id, enabled.clone(), compiled.modules.clone())
            .expect("distributor should boot");
    }
    registry
}

/// A two-module blog site used across scenarios.
#[allow(dead_code)]
pub const BLOG_SITE: &str = r#"
[[distributor]]
id = "main"
[distributor.modules]
"acme/blog" = "*"

[[module]]
code = "acme/core"
version = "1.2.0"

[[module.route]]
kind = "absolute"
pattern = "/"
handler = "home"

[[module]]
code = "acme/core"
version = "2.0.0"

[[module]]
code = "acme/blog"
version = "1.0.0"
[module.requires]
"acme/core" = "^1.0.0"

[[module.route]]
kind = "lazy"
pattern = "@self"
handler = "index"

[[module.route]]
kind = "lazy"
pattern = "post/:d"
handler = "post.show"

[[module.route]]
kind = "absolute"
pattern = "/user/(:d)"
handler = "user.profile"

[module.bridge]
ping = "bridge.ping"
"#;
