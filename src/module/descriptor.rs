//! Immutable per-version module metadata.
//!
//! A descriptor is the core's view of one installed module version: its
//! identity, its dependency requirements, and the routes and commands it
//! declares. Descriptors arrive already parsed from an external loader (the
//! `config` module in this repository); the core never touches storage.

use std::collections::BTreeMap;
use std::fmt;

use crate::version::{Version, VersionRange};

/// An opaque handler reference.
///
/// The core stores and returns handler references but never invokes them;
/// invocation belongs to the web-request boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandlerRef {
    /// Code of the module that owns the handler.
    pub module: String,
    /// Opaque symbol the boundary resolves to an invocable.
    pub symbol: String,
}

impl HandlerRef {
    pub fn new(module: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            symbol: symbol.into(),
        }
    }
}

impl fmt::Display for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.module, self.symbol)
    }
}

/// How a route participates in dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// Relative to the owning module's URL alias, prefix-scoped, no captures.
    Lazy,
    /// Anchored at the distributor root, may capture.
    Absolute,
    /// Forwards dispatch to another module's handler or lazy table.
    Shadow,
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteKind::Lazy => write!(f, "lazy"),
            RouteKind::Absolute => write!(f, "absolute"),
            RouteKind::Shadow => write!(f, "shadow"),
        }
    }
}

/// Where a matched route resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTarget {
    /// Direct handler binding (Lazy and Absolute routes).
    Handler(HandlerRef),
    /// Shadow: forward the remainder to another module's lazy table.
    ShadowModule { module: String },
    /// Shadow: bind to the route another module declared under `pattern`.
    /// Resolved when the table is finalized; a shadow target that is itself
    /// a shadow route is rejected there.
    ShadowPattern { module: String, pattern: String },
    /// Shadow: forward straight to a specific handler of another module.
    ShadowHandler(HandlerRef),
}

/// One route declaration, created during module registration and immutable
/// thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDecl {
    pub kind: RouteKind,
    /// Pattern source in the token grammar (see `routing::pattern`).
    pub pattern: String,
    pub target: RouteTarget,
    /// Code of the declaring module.
    pub owner: String,
}

/// Immutable metadata for one module version.
///
/// `code` is `vendor/name` and unique within a distributor; `alias` is the
/// URL segment lazy routes live under, defaulting to the name part of the
/// code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    pub code: String,
    pub version: Version,
    pub alias: String,
    /// Declared dependencies: module code → acceptable version range.
    pub requires: BTreeMap<String, VersionRange>,
    pub routes: Vec<RouteDecl>,
    /// API commands exposed within the distributor.
    pub api_commands: BTreeMap<String, HandlerRef>,
    /// Commands exposed for cross-distributor invocation.
    pub bridge_commands: BTreeMap<String, HandlerRef>,
}

impl ModuleDescriptor {
    /// Construct a descriptor with the default alias (the name part of the
    /// module code).
    pub fn new(code: impl Into<String>, version: Version) -> Self {
        let code = code.into();
        let alias = default_alias(&code);
        Self {
            code,
            version,
            alias,
            requires: BTreeMap::new(),
            routes: Vec::new(),
            api_commands: BTreeMap::new(),
            bridge_commands: BTreeMap::new(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    pub fn with_requirement(mut self, code: impl Into<String>, range: VersionRange) -> Self {
        self.requires.insert(code.into(), range);
        self
    }

    pub fn with_route(mut self, decl: RouteDecl) -> Self {
        self.routes.push(decl);
        self
    }

    /// Declare a lazy route bound to one of this module's own handlers.
    pub fn with_lazy_route(mut self, pattern: impl Into<String>, symbol: &str) -> Self {
        let handler = HandlerRef::new(self.code.clone(), symbol);
        self.routes.push(RouteDecl {
            kind: RouteKind::Lazy,
            pattern: pattern.into(),
            target: RouteTarget::Handler(handler),
            owner: self.code.clone(),
        });
        self
    }

    /// Declare an absolute route bound to one of this module's own handlers.
    pub fn with_absolute_route(mut self, pattern: impl Into<String>, symbol: &str) -> Self {
        let handler = HandlerRef::new(self.code.clone(), symbol);
        self.routes.push(RouteDecl {
            kind: RouteKind::Absolute,
            pattern: pattern.into(),
            target: RouteTarget::Handler(handler),
            owner: self.code.clone(),
        });
        self
    }

    /// Declare a shadow route forwarding to another module's lazy table.
    pub fn with_shadow_route(
        mut self,
        pattern: impl Into<String>,
        target_module: impl Into<String>,
    ) -> Self {
        self.routes.push(RouteDecl {
            kind: RouteKind::Shadow,
            pattern: pattern.into(),
            target: RouteTarget::ShadowModule {
                module: target_module.into(),
            },
            owner: self.code.clone(),
        });
        self
    }

    /// Declare a shadow route bound to the route another module declared
    /// under `target_pattern`.
    pub fn with_shadow_pattern_route(
        mut self,
        pattern: impl Into<String>,
        target_module: impl Into<String>,
        target_pattern: impl Into<String>,
    ) -> Self {
        self.routes.push(RouteDecl {
            kind: RouteKind::Shadow,
            pattern: pattern.into(),
            target: RouteTarget::ShadowPattern {
                module: target_module.into(),
                pattern: target_pattern.into(),
            },
            owner: self.code.clone(),
        });
        self
    }

    pub fn with_api_command(mut self, name: impl Into<String>, symbol: &str) -> Self {
        let handler = HandlerRef::new(self.code.clone(), symbol);
        self.api_commands.insert(name.into(), handler);
        self
    }

    pub fn with_bridge_command(mut self, name: impl Into<String>, symbol: &str) -> Self {
        let handler = HandlerRef::new(self.code.clone(), symbol);
        self.bridge_commands.insert(name.into(), handler);
        self
    }
}

/// Default URL alias: the name part of a `vendor/name` code.
pub fn default_alias(code: &str) -> String {
    code.rsplit('/').next().unwrap_or(code).to_string()
}
