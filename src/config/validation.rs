//! Manifest validation and descriptor construction.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Parse version and range expressions with context-rich errors
//! - Build `ModuleDescriptor`s and per-distributor enable lists
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Pure function: `Manifest` → `CompiledManifest` or error list

use std::fmt;

use crate::config::schema::{Manifest, ModuleConfig, RouteConfig, RouteKindConfig};
use crate::module::descriptor::{
    default_alias, HandlerRef, ModuleDescriptor, RouteDecl, RouteKind, RouteTarget,
};
use crate::version::{Version, VersionRange};

/// One semantic problem in a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    DuplicateDistributor {
        id: String,
    },
    MalformedVersion {
        module: String,
        value: String,
    },
    MalformedRange {
        context: String,
        dependency: String,
        value: String,
    },
    MissingHandler {
        module: String,
        pattern: String,
    },
    MissingShadowTarget {
        module: String,
        pattern: String,
    },
    /// `handler`/`target_*` fields on a kind that does not take them.
    ForeignField {
        module: String,
        pattern: String,
        field: &'static str,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DuplicateDistributor { id } => {
                write!(f, "duplicate distributor id '{id}'")
            }
            ValidationError::MalformedVersion { module, value } => {
                write!(f, "module '{module}' has malformed version '{value}'")
            }
            ValidationError::MalformedRange {
                context,
                dependency,
                value,
            } => write!(
                f,
                "'{context}' declares malformed range '{value}' for '{dependency}'"
            ),
            ValidationError::MissingHandler { module, pattern } => {
                write!(f, "route '{pattern}' of '{module}' names no handler")
            }
            ValidationError::MissingShadowTarget { module, pattern } => {
                write!(f, "shadow route '{pattern}' of '{module}' names no target module")
            }
            ValidationError::ForeignField {
                module,
                pattern,
                field,
            } => write!(
                f,
                "route '{pattern}' of '{module}' sets '{field}', which its kind does not take"
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// The engine-ready form of a manifest.
#[derive(Debug, Clone, Default)]
pub struct CompiledManifest {
    /// Per distributor: (id, enabled module list with parsed selectors).
    pub distributors: Vec<(String, Vec<(String, VersionRange)>)>,
    /// Every installed module descriptor.
    pub modules: Vec<ModuleDescriptor>,
}

/// Validate a manifest and build descriptors. Collects every error found.
pub fn compile_manifest(manifest: &Manifest) -> Result<CompiledManifest, Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut compiled = CompiledManifest::default();

    let mut seen_ids = std::collections::HashSet::new();
    for dist in &manifest.distributors {
        if !seen_ids.insert(&dist.id) {
            errors.push(ValidationError::DuplicateDistributor {
                id: dist.id.clone(),
            });
            continue;
        }
        let mut enabled = Vec::with_capacity(dist.modules.len());
        for (code, expr) in &dist.modules {
            match VersionRange::parse(expr) {
                Ok(range) => enabled.push((code.clone(), range)),
                Err(_) => errors.push(ValidationError::MalformedRange {
                    context: dist.id.clone(),
                    dependency: code.clone(),
                    value: expr.clone(),
                }),
            }
        }
        compiled.distributors.push((dist.id.clone(), enabled));
    }

    for module in &manifest.modules {
        match compile_module(module) {
            Ok(descriptor) => compiled.modules.push(descriptor),
            Err(mut module_errors) => errors.append(&mut module_errors),
        }
    }

    if errors.is_empty() {
        Ok(compiled)
    } else {
        Err(errors)
    }
}

fn compile_module(module: &ModuleConfig) -> Result<ModuleDescriptor, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let version = match Version::parse(&module.version) {
        Ok(v) => v,
        Err(_) => {
            errors.push(ValidationError::MalformedVersion {
                module: module.code.clone(),
                value: module.version.clone(),
            });
            Version::new(0, 0, 0)
        }
    };

    let mut descriptor = ModuleDescriptor::new(module.code.clone(), version);
    descriptor.alias = module
        .alias
        .clone()
        .unwrap_or_else(|| default_alias(&module.code));

    for (dep, expr) in &module.requires {
        match VersionRange::parse(expr) {
            Ok(range) => {
                descriptor.requires.insert(dep.clone(), range);
            }
            Err(_) => errors.push(ValidationError::MalformedRange {
                context: module.code.clone(),
                dependency: dep.clone(),
                value: expr.clone(),
            }),
        }
    }

    for route in &module.routes {
        match compile_route(module, route) {
            Ok(decl) => descriptor.routes.push(decl),
            Err(e) => errors.push(e),
        }
    }

    for (name, symbol) in &module.api {
        descriptor
            .api_commands
            .insert(name.clone(), HandlerRef::new(module.code.clone(), symbol));
    }
    for (name, symbol) in &module.bridge {
        descriptor
            .bridge_commands
            .insert(name.clone(), HandlerRef::new(module.code.clone(), symbol));
    }

    if errors.is_empty() {
        Ok(descriptor)
    } else {
        Err(errors)
    }
}

fn compile_route(module: &ModuleConfig, route: &RouteConfig) -> Result<RouteDecl, ValidationError> {
    match route.kind {
        RouteKindConfig::Lazy | RouteKindConfig::Absolute => {
            if route.target_module.is_some() || route.target_pattern.is_some() {
                return Err(ValidationError::ForeignField {
                    module: module.code.clone(),
                    pattern: route.pattern.clone(),
                    field: "target_module",
                });
            }
            let symbol = route
                .handler
                .as_deref()
                .ok_or_else(|| ValidationError::MissingHandler {
                    module: module.code.clone(),
                    pattern: route.pattern.clone(),
                })?;
            Ok(RouteDecl {
                kind: match route.kind {
                    RouteKindConfig::Lazy => RouteKind::Lazy,
                    _ => RouteKind::Absolute,
                },
                pattern: route.pattern.clone(),
                target: RouteTarget::Handler(HandlerRef::new(module.code.clone(), symbol)),
                owner: module.code.clone(),
            })
        }
        RouteKindConfig::Shadow => {
            let target_module = route.target_module.as_deref().ok_or_else(|| {
                ValidationError::MissingShadowTarget {
                    module: module.code.clone(),
                    pattern: route.pattern.clone(),
                }
            })?;
            let target = match (&route.target_pattern, &route.handler) {
                (Some(pattern), None) => RouteTarget::ShadowPattern {
                    module: target_module.to_string(),
                    pattern: pattern.clone(),
                },
                (None, Some(symbol)) => {
                    RouteTarget::ShadowHandler(HandlerRef::new(target_module, symbol))
                }
                (None, None) => RouteTarget::ShadowModule {
                    module: target_module.to_string(),
                },
                (Some(_), Some(_)) => {
                    return Err(ValidationError::ForeignField {
                        module: module.code.clone(),
                        pattern: route.pattern.clone(),
                        field: "handler",
                    })
                }
            };
            Ok(RouteDecl {
                kind: RouteKind::Shadow,
                pattern: route.pattern.clone(),
                target,
                owner: module.code.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(input: &str) -> Manifest {
        toml::from_str(input).unwrap()
    }

    #[test]
    fn test_compile_valid_manifest() {
        let compiled = compile_manifest(&manifest(
            r#"
            [[distributor]]
            id = "main"
            [distributor.modules]
            "acme/blog" = "*"

            [[module]]
            code = "acme/blog"
            version = "1.0.0"
            [module.requires]
            "acme/core" = "^1.0.0"

            [[module.route]]
            kind = "lazy"
            pattern = "post/:d"
            handler = "post.show"

            [[module]]
            code = "acme/core"
            version = "1.2.0"
            "#,
        ))
        .unwrap();

        assert_eq!(compiled.distributors.len(), 1);
        assert_eq!(compiled.modules.len(), 2);
        let blog = &compiled.modules[0];
        assert_eq!(blog.alias, "blog");
        assert_eq!(blog.routes.len(), 1);
        assert_eq!(blog.routes[0].kind, RouteKind::Lazy);
    }

    #[test]
    fn test_all_errors_collected() {
        let err = compile_manifest(&manifest(
            r#"
            [[distributor]]
            id = "main"
            [distributor.modules]
            "acme/a" = "not-a-range"

            [[distributor]]
            id = "main"

            [[module]]
            code = "acme/a"
            version = "one.two"

            [[module.route]]
            kind = "absolute"
            pattern = "/x"
            "#,
        ))
        .unwrap_err();

        assert!(err.len() >= 3);
        assert!(err
            .iter()
            .any(|e| matches!(e, ValidationError::DuplicateDistributor { .. })));
        assert!(err
            .iter()
            .any(|e| matches!(e, ValidationError::MalformedRange { .. })));
        assert!(err
            .iter()
            .any(|e| matches!(e, ValidationError::MalformedVersion { .. })));
        assert!(err
            .iter()
            .any(|e| matches!(e, ValidationError::MissingHandler { .. })));
    }

    #[test]
    fn test_shadow_without_target_rejected() {
        let err = compile_manifest(&manifest(
            r#"
            [[module]]
            code = "acme/legacy"
            version = "1.0.0"

            [[module.route]]
            kind = "shadow"
            pattern = "/legacy"
            "#,
        ))
        .unwrap_err();
        assert!(matches!(
            err[0],
            ValidationError::MissingShadowTarget { .. }
        ));
    }

    #[test]
    fn test_alias_override() {
        let compiled = compile_manifest(&manifest(
            r#"
            [[module]]
            code = "acme/blog"
            version = "1.0.0"
            alias = "journal"
            "#,
        ))
        .unwrap();
        assert_eq!(compiled.modules[0].alias, "journal");
    }
}
