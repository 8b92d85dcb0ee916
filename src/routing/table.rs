//! The per-distributor route table.
//!
//! # Responsibilities
//! - Hold compiled routes: an ordered absolute list, a lazy trie per module
//!   alias, and shadow redirection entries
//! - Detect registration-time conflicts (duplicate absolute patterns,
//!   alias collisions, shadow chains)
//! - Resolve an inbound path to a handler plus captured parameters
//!
//! # Matching policy
//! 1. Absolute (and shadow) entries first, in registration order; a cheap
//!    literal-prefix check rejects before the regex runs. First match wins —
//!    this is a first-match design, not longest-match.
//! 2. Otherwise the first path segment selects a module alias and the
//!    remainder walks that module's lazy trie. A node's own handler matches
//!    only on exact remainder exhaustion, never as a prefix fallback;
//!    literal children are tried before pattern children.
//! 3. A matched shadow entry substitutes its target: a handler target
//!    returns directly, a module target re-resolves the remainder against
//!    the target module's lazy trie. One hop at most, enforced when the
//!    table is finalized.
//!
//! # Design Decisions
//! - Immutable after finalize; dispatch is read-only and lock-free
//! - Compilation failures surface at registration, never at dispatch

use std::collections::HashMap;

use regex::Regex;
use thiserror::Error;

use crate::module::descriptor::{
    HandlerRef, ModuleDescriptor, RouteDecl, RouteKind, RouteTarget,
};
use crate::routing::pattern::{self, CompiledRoute, PatternError};

/// Registration-time failures. Fatal to the offending module's load, never
/// to sibling modules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// Two anchored routes with an identical pattern source.
    #[error("route '{pattern}' already registered by {existing}, rejected for {incoming}")]
    RouteConflict {
        pattern: String,
        existing: String,
        incoming: String,
    },

    /// Two modules claiming the same URL alias.
    #[error("alias '{alias}' already claimed by {existing}, rejected for {incoming}")]
    AliasConflict {
        alias: String,
        existing: String,
        incoming: String,
    },

    /// A shadow route whose target is itself a shadow route.
    #[error("shadow route '{pattern}' of {owner} targets shadow route '{target_pattern}' of {target_module}")]
    ShadowChain {
        owner: String,
        pattern: String,
        target_module: String,
        target_pattern: String,
    },

    /// A shadow route naming a module or pattern that is not loaded.
    #[error("shadow route '{pattern}' of {owner} targets unknown {target}")]
    ShadowTargetMissing {
        owner: String,
        pattern: String,
        target: String,
    },
}

/// Request-time miss. Maps to a 404-equivalent at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no route matches '{path}'")]
pub struct NotFound {
    pub path: String,
}

/// A successful dispatch resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub handler: HandlerRef,
    /// Captured text, left to right. Empty for lazy routes.
    pub params: Vec<String>,
}

/// Shadow indirection, resolved at finalize so dispatch is one hop.
#[derive(Debug, Clone)]
enum ShadowBinding {
    /// Forward straight to a handler; the remainder must be empty.
    Handler(HandlerRef),
    /// Re-resolve the remainder against this module's lazy trie.
    ModuleTrie(String),
}

#[derive(Debug, Clone)]
struct AnchoredEntry {
    route: CompiledRoute,
    /// Leading literal portion of the pattern, for cheap rejection.
    literal_prefix: String,
    /// Present on shadow entries after finalize.
    shadow: Option<ShadowBinding>,
}

/// One level of a module's lazy trie.
#[derive(Debug, Clone, Default)]
struct LazyNode {
    /// The node's own handler; only an exact remainder match lands here.
    handler: Option<HandlerRef>,
    literal: HashMap<String, LazyNode>,
    patterns: Vec<PatternChild>,
}

#[derive(Debug, Clone)]
struct PatternChild {
    matcher: Regex,
    specificity: u32,
    source: String,
    node: LazyNode,
}

#[derive(Debug, Clone, Default)]
struct LazyModule {
    code: String,
    root: LazyNode,
}

/// Compiled routes for one distributor. Built single-threaded at boot,
/// immutable afterwards.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    anchored: Vec<AnchoredEntry>,
    /// Module alias → lazy trie.
    lazy: HashMap<String, LazyModule>,
    /// Module code → alias, for shadow indirection.
    alias_of: HashMap<String, String>,
    /// Every declaration inserted, per module, for shadow target lookup.
    decls: HashMap<String, Vec<RouteDecl>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every route of one module.
    ///
    /// All-or-nothing per module: patterns are compiled and conflicts
    /// checked before anything is committed, so a failing module leaves the
    /// table untouched and sibling modules unaffected.
    pub fn insert_module(&mut self, descriptor: &ModuleDescriptor) -> Result<(), RegistrationError> {
        // Alias check first: every module owns a lazy namespace even if it
        // declares no lazy routes yet.
        if let Some(existing) = self.lazy.get(&descriptor.alias) {
            if existing.code != descriptor.code {
                return Err(RegistrationError::AliasConflict {
                    alias: descriptor.alias.clone(),
                    existing: existing.code.clone(),
                    incoming: descriptor.code.clone(),
                });
            }
        }

        let mut anchored: Vec<AnchoredEntry> = Vec::new();
        let mut lazy_root = LazyNode::default();

        for decl in &descriptor.routes {
            match decl.kind {
                RouteKind::Absolute | RouteKind::Shadow => {
                    let route = pattern::compile(decl)?;
                    let duplicate = self
                        .anchored
                        .iter()
                        .map(|e| &e.route.decl)
                        .chain(anchored.iter().map(|e| &e.route.decl))
                        .find(|existing| existing.pattern == decl.pattern);
                    if let Some(existing) = duplicate {
                        return Err(RegistrationError::RouteConflict {
                            pattern: decl.pattern.clone(),
                            existing: existing.owner.clone(),
                            incoming: decl.owner.clone(),
                        });
                    }
                    let literal_prefix = literal_prefix(&decl.pattern);
                    anchored.push(AnchoredEntry {
                        route,
                        literal_prefix,
                        shadow: None,
                    });
                }
                RouteKind::Lazy => {
                    insert_lazy(&mut lazy_root, decl)?;
                }
            }
        }

        // Commit.
        self.anchored.extend(anchored);
        let module = self
            .lazy
            .entry(descriptor.alias.clone())
            .or_insert_with(|| LazyModule {
                code: descriptor.code.clone(),
                root: LazyNode::default(),
            });
        merge_lazy(&mut module.root, lazy_root);
        self.alias_of
            .insert(descriptor.code.clone(), descriptor.alias.clone());
        self.decls
            .entry(descriptor.code.clone())
            .or_default()
            .extend(descriptor.routes.iter().cloned());
        Ok(())
    }

    /// Resolve shadow indirection and freeze ordering.
    ///
    /// Shadow targets may belong to modules registered later, so binding
    /// happens once every module is in. Offending shadow entries are removed
    /// and reported; sibling routes keep working. Returns the registration
    /// failures attributed to the owning module.
    pub fn finalize(&mut self) -> Vec<(String, RegistrationError)> {
        let mut failures = Vec::new();

        let mut bindings: Vec<Option<ShadowBinding>> = Vec::with_capacity(self.anchored.len());
        for entry in &self.anchored {
            if entry.route.decl.kind != RouteKind::Shadow {
                bindings.push(None);
                continue;
            }
            match self.bind_shadow(&entry.route.decl) {
                Ok(binding) => bindings.push(Some(binding)),
                Err(err) => {
                    failures.push((entry.route.decl.owner.clone(), err));
                    bindings.push(None);
                }
            }
        }

        let mut keep = bindings.into_iter();
        self.anchored.retain_mut(|entry| {
            let binding = keep.next().unwrap_or(None);
            if entry.route.decl.kind == RouteKind::Shadow {
                match binding {
                    Some(b) => {
                        entry.shadow = Some(b);
                        true
                    }
                    None => false,
                }
            } else {
                true
            }
        });

        // Literal children already win via the lookup order; pattern
        // children are tried most-specific first.
        for module in self.lazy.values_mut() {
            sort_patterns(&mut module.root);
        }

        failures
    }

    fn bind_shadow(&self, decl: &RouteDecl) -> Result<ShadowBinding, RegistrationError> {
        match &decl.target {
            RouteTarget::Handler(h) => Ok(ShadowBinding::Handler(h.clone())),
            RouteTarget::ShadowHandler(h) => Ok(ShadowBinding::Handler(h.clone())),
            RouteTarget::ShadowModule { module } => {
                if !self.alias_of.contains_key(module) {
                    return Err(RegistrationError::ShadowTargetMissing {
                        owner: decl.owner.clone(),
                        pattern: decl.pattern.clone(),
                        target: format!("module '{module}'"),
                    });
                }
                Ok(ShadowBinding::ModuleTrie(module.clone()))
            }
            RouteTarget::ShadowPattern { module, pattern } => {
                let target = self
                    .decls
                    .get(module)
                    .and_then(|decls| decls.iter().find(|d| &d.pattern == pattern))
                    .ok_or_else(|| RegistrationError::ShadowTargetMissing {
                        owner: decl.owner.clone(),
                        pattern: decl.pattern.clone(),
                        target: format!("route '{pattern}' of module '{module}'"),
                    })?;
                if target.kind == RouteKind::Shadow {
                    return Err(RegistrationError::ShadowChain {
                        owner: decl.owner.clone(),
                        pattern: decl.pattern.clone(),
                        target_module: module.clone(),
                        target_pattern: pattern.clone(),
                    });
                }
                match &target.target {
                    RouteTarget::Handler(h) => Ok(ShadowBinding::Handler(h.clone())),
                    // Non-shadow declarations always carry a handler.
                    _ => Err(RegistrationError::ShadowTargetMissing {
                        owner: decl.owner.clone(),
                        pattern: decl.pattern.clone(),
                        target: format!("route '{pattern}' of module '{module}'"),
                    }),
                }
            }
        }
    }

    /// Resolve a request path against the table.
    pub fn resolve(&self, path: &str) -> Result<RouteMatch, NotFound> {
        // Rule 1: anchored entries, registration order, first match wins.
        for entry in &self.anchored {
            if !path.starts_with(entry.literal_prefix.as_str()) {
                continue;
            }
            match &entry.shadow {
                None => {
                    if let Some(caps) = entry.route.matcher.captures(path) {
                        let params = caps
                            .iter()
                            .skip(1)
                            .flatten()
                            .map(|m| m.as_str().to_string())
                            .collect();
                        return Ok(RouteMatch {
                            handler: route_handler(&entry.route.decl),
                            params,
                        });
                    }
                }
                Some(binding) => {
                    let Some(found) = entry.route.matcher.find(path) else {
                        continue;
                    };
                    if found.start() != 0 {
                        continue;
                    }
                    let remainder = &path[found.end()..];
                    // The matched prefix must end on a segment boundary:
                    // `/legacy` forwards `/legacy/post` but not `/legacypost`.
                    if !remainder.is_empty() && !remainder.starts_with('/') {
                        continue;
                    }
                    match binding {
                        ShadowBinding::Handler(h) => {
                            if remainder.is_empty() || remainder == "/" {
                                return Ok(RouteMatch {
                                    handler: h.clone(),
                                    params: Vec::new(),
                                });
                            }
                        }
                        ShadowBinding::ModuleTrie(code) => {
                            if let Some(m) = self.resolve_module_trie(code, remainder) {
                                return Ok(m);
                            }
                        }
                    }
                }
            }
        }

        // Rule 2: lazy routes, scoped by module alias.
        let trimmed = path.trim_matches('/');
        let mut segments = trimmed.split('/').filter(|s| !s.is_empty());
        if let Some(alias) = segments.next() {
            if let Some(module) = self.lazy.get(alias) {
                let rest: Vec<&str> = segments.collect();
                if let Some(m) = resolve_lazy(&module.root, &rest) {
                    return Ok(m);
                }
            }
        }

        Err(NotFound {
            path: path.to_string(),
        })
    }

    /// Walk a module's lazy trie with an already alias-stripped remainder.
    fn resolve_module_trie(&self, code: &str, remainder: &str) -> Option<RouteMatch> {
        let alias = self.alias_of.get(code)?;
        let module = self.lazy.get(alias)?;
        let segments: Vec<&str> = remainder
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        resolve_lazy(&module.root, &segments)
    }

    /// Number of routes currently registered (anchored plus lazy handlers).
    pub fn len(&self) -> usize {
        let lazy: usize = self.lazy.values().map(|m| count_handlers(&m.root)).sum();
        self.anchored.len() + lazy
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn route_handler(decl: &RouteDecl) -> HandlerRef {
    match &decl.target {
        RouteTarget::Handler(h) => h.clone(),
        // Shadow declarations never reach here: their binding is resolved at
        // finalize. Fall back to the owner so a defect stays diagnosable.
        RouteTarget::ShadowHandler(h) => h.clone(),
        RouteTarget::ShadowModule { module } | RouteTarget::ShadowPattern { module, .. } => {
            HandlerRef::new(module.clone(), "@shadow")
        }
    }
}

/// Leading literal portion of an anchored pattern, truncated at the last
/// `/` before the first token or group.
fn literal_prefix(pattern: &str) -> String {
    match pattern.find(|c| matches!(c, ':' | '(' | '{')) {
        None => pattern.to_string(),
        Some(cut) => {
            let literal = &pattern[..cut];
            match literal.rfind('/') {
                Some(idx) => literal[..=idx].to_string(),
                None => literal.to_string(),
            }
        }
    }
}

/// Insert one lazy declaration into a module trie under construction.
fn insert_lazy(root: &mut LazyNode, decl: &RouteDecl) -> Result<(), RegistrationError> {
    // Compile-check the declaration as a whole first so token errors (and
    // the capture prohibition) surface with the full pattern.
    pattern::compile(decl)?;

    let handler = match &decl.target {
        RouteTarget::Handler(h) => h.clone(),
        // Shadow targets are anchored entries; a lazy declaration always
        // binds its own handler.
        _ => HandlerRef::new(decl.owner.clone(), "@self"),
    };

    let mut node = root;
    for segment in decl
        .pattern
        .trim_matches('/')
        .split('/')
        .filter(|s| !s.is_empty() && *s != "@self")
    {
        if segment.contains(':') {
            let matcher = pattern::compile_segment(segment, &decl.pattern)?;
            let position = node.patterns.iter().position(|p| p.source == segment);
            let idx = match position {
                Some(idx) => idx,
                None => {
                    node.patterns.push(PatternChild {
                        matcher,
                        specificity: pattern::segment_specificity(segment),
                        source: segment.to_string(),
                        node: LazyNode::default(),
                    });
                    node.patterns.len() - 1
                }
            };
            node = &mut node.patterns[idx].node;
        } else {
            node = node.literal.entry(segment.to_string()).or_default();
        }
    }

    if let Some(existing) = &node.handler {
        return Err(RegistrationError::RouteConflict {
            pattern: decl.pattern.clone(),
            existing: existing.module.clone(),
            incoming: decl.owner.clone(),
        });
    }
    node.handler = Some(handler);
    Ok(())
}

/// Merge a freshly built per-module trie into the committed one.
fn merge_lazy(into: &mut LazyNode, from: LazyNode) {
    if from.handler.is_some() {
        into.handler = from.handler;
    }
    for (segment, child) in from.literal {
        merge_lazy(into.literal.entry(segment).or_default(), child);
    }
    for child in from.patterns {
        match into.patterns.iter_mut().find(|p| p.source == child.source) {
            Some(existing) => merge_lazy(&mut existing.node, child.node),
            None => into.patterns.push(child),
        }
    }
}

fn sort_patterns(node: &mut LazyNode) {
    node.patterns.sort_by(|a, b| b.specificity.cmp(&a.specificity));
    for child in node.literal.values_mut() {
        sort_patterns(child);
    }
    for child in &mut node.patterns {
        sort_patterns(&mut child.node);
    }
}

fn count_handlers(node: &LazyNode) -> usize {
    let own = usize::from(node.handler.is_some());
    let literal: usize = node.literal.values().map(count_handlers).sum();
    let patterns: usize = node.patterns.iter().map(|p| count_handlers(&p.node)).sum();
    own + literal + patterns
}

/// Walk a lazy trie. `@self` (the node's own handler) resolves only when
/// the remainder is exhausted, never as a prefix fallback.
fn resolve_lazy(node: &LazyNode, segments: &[&str]) -> Option<RouteMatch> {
    let Some((head, rest)) = segments.split_first() else {
        return node.handler.as_ref().map(|h| RouteMatch {
            handler: h.clone(),
            params: Vec::new(),
        });
    };

    if let Some(child) = node.literal.get(*head) {
        if let Some(m) = resolve_lazy(child, rest) {
            return Some(m);
        }
    }
    for child in &node.patterns {
        if child.matcher.is_match(head) {
            if let Some(m) = resolve_lazy(&child.node, rest) {
                return Some(m);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::descriptor::ModuleDescriptor;
    use crate::version::Version;

    fn blog() -> ModuleDescriptor {
        ModuleDescriptor::new("acme/blog", Version::new(1, 0, 0))
            .with_lazy_route("@self", "index")
            .with_lazy_route("post/:d", "post.show")
            .with_lazy_route("post/latest", "post.latest")
            .with_absolute_route("/feed", "feed.rss")
            .with_absolute_route("/user/(:d)", "user.profile")
    }

    fn table_with(modules: &[ModuleDescriptor]) -> RouteTable {
        let mut table = RouteTable::new();
        for m in modules {
            table.insert_module(m).unwrap();
        }
        let failures = table.finalize();
        assert!(failures.is_empty(), "unexpected failures: {failures:?}");
        table
    }

    #[test]
    fn test_absolute_capture_round_trip() {
        let table = table_with(&[blog()]);
        let m = table.resolve("/user/42").unwrap();
        assert_eq!(m.handler, HandlerRef::new("acme/blog", "user.profile"));
        assert_eq!(m.params, vec!["42".to_string()]);

        assert!(table.resolve("/user/abc").is_err());
    }

    #[test]
    fn test_lazy_alias_scoping() {
        let table = table_with(&[blog()]);
        let m = table.resolve("/blog/post/42").unwrap();
        assert_eq!(m.handler, HandlerRef::new("acme/blog", "post.show"));
        assert!(m.params.is_empty());

        // Wrong alias: structurally no collision, just a miss.
        assert!(table.resolve("/other/post/42").is_err());
    }

    #[test]
    fn test_literal_child_beats_pattern_child() {
        let table = table_with(&[blog()]);
        let m = table.resolve("/blog/post/latest").unwrap();
        assert_eq!(m.handler, HandlerRef::new("acme/blog", "post.latest"));
    }

    #[test]
    fn test_self_exact_match_only() {
        let table = table_with(&[blog()]);
        let m = table.resolve("/blog").unwrap();
        assert_eq!(m.handler, HandlerRef::new("acme/blog", "index"));
        assert!(table.resolve("/blog/nonexistent").is_err());
    }

    #[test]
    fn test_absolute_checked_before_lazy() {
        // An absolute route under another module's alias prefix still wins.
        let other = ModuleDescriptor::new("acme/admin", Version::new(1, 0, 0))
            .with_absolute_route("/blog/admin", "panel");
        let table = table_with(&[blog(), other]);
        let m = table.resolve("/blog/admin").unwrap();
        assert_eq!(m.handler, HandlerRef::new("acme/admin", "panel"));
    }

    #[test]
    fn test_first_registered_absolute_wins() {
        let first = ModuleDescriptor::new("acme/a", Version::new(1, 0, 0))
            .with_absolute_route("/p/(:d)", "a.first");
        let second = ModuleDescriptor::new("acme/b", Version::new(1, 0, 0))
            .with_absolute_route("/p/(:[0-9])", "b.second");
        let table = table_with(&[first, second]);
        let m = table.resolve("/p/7").unwrap();
        assert_eq!(m.handler, HandlerRef::new("acme/a", "a.first"));
    }

    #[test]
    fn test_duplicate_absolute_pattern_conflict() {
        let mut table = RouteTable::new();
        table
            .insert_module(
                &ModuleDescriptor::new("acme/a", Version::new(1, 0, 0))
                    .with_absolute_route("/", "a.root"),
            )
            .unwrap();
        let err = table
            .insert_module(
                &ModuleDescriptor::new("acme/b", Version::new(1, 0, 0))
                    .with_absolute_route("/", "b.root"),
            )
            .unwrap_err();
        assert!(matches!(err, RegistrationError::RouteConflict { .. }));
    }

    #[test]
    fn test_failed_module_leaves_table_untouched() {
        let mut table = RouteTable::new();
        let bad = ModuleDescriptor::new("acme/bad", Version::new(1, 0, 0))
            .with_absolute_route("/ok", "ok")
            .with_lazy_route("oops/(:d)", "capture.in.lazy");
        assert!(table.insert_module(&bad).is_err());
        assert!(table.is_empty());
        assert!(table.resolve("/ok").is_err());
    }

    #[test]
    fn test_alias_conflict() {
        let mut table = RouteTable::new();
        table
            .insert_module(&ModuleDescriptor::new("acme/blog", Version::new(1, 0, 0)))
            .unwrap();
        let err = table
            .insert_module(
                &ModuleDescriptor::new("other/site", Version::new(1, 0, 0)).with_alias("blog"),
            )
            .unwrap_err();
        assert!(matches!(err, RegistrationError::AliasConflict { .. }));
    }

    #[test]
    fn test_shadow_to_module_trie() {
        let shadow = ModuleDescriptor::new("acme/legacy", Version::new(1, 0, 0))
            .with_shadow_route("/legacy", "acme/blog");
        let table = table_with(&[blog(), shadow]);

        let m = table.resolve("/legacy/post/42").unwrap();
        assert_eq!(m.handler, HandlerRef::new("acme/blog", "post.show"));

        // Empty remainder lands on the target's @self handler.
        let m = table.resolve("/legacy").unwrap();
        assert_eq!(m.handler, HandlerRef::new("acme/blog", "index"));
    }

    #[test]
    fn test_shadow_prefix_ends_on_segment_boundary() {
        let shadow = ModuleDescriptor::new("acme/legacy", Version::new(1, 0, 0))
            .with_shadow_route("/legacy", "acme/blog");
        let table = table_with(&[blog(), shadow]);

        // Sharing leading characters is not a prefix match.
        assert!(table.resolve("/legacypost/42").is_err());
        assert!(table.resolve("/legacy-archive").is_err());
        assert!(table.resolve("/legacy/post/42").is_ok());
    }

    #[test]
    fn test_shadow_to_handler_pattern() {
        let shadow = ModuleDescriptor::new("acme/legacy", Version::new(1, 0, 0))
            .with_shadow_pattern_route("/rss", "acme/blog", "/feed");
        let table = table_with(&[blog(), shadow]);
        let m = table.resolve("/rss").unwrap();
        assert_eq!(m.handler, HandlerRef::new("acme/blog", "feed.rss"));
    }

    #[test]
    fn test_shadow_chain_rejected() {
        let first = ModuleDescriptor::new("acme/legacy", Version::new(1, 0, 0))
            .with_shadow_pattern_route("/old", "acme/blog", "/feed");
        let second = ModuleDescriptor::new("acme/older", Version::new(1, 0, 0))
            .with_shadow_pattern_route("/ancient", "acme/legacy", "/old");

        let mut table = RouteTable::new();
        table.insert_module(&blog()).unwrap();
        table.insert_module(&first).unwrap();
        table.insert_module(&second).unwrap();

        let failures = table.finalize();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "acme/older");
        assert!(matches!(
            failures[0].1,
            RegistrationError::ShadowChain { .. }
        ));

        // The offending entry is gone; the first hop still works.
        assert!(table.resolve("/ancient").is_err());
        assert!(table.resolve("/old").is_ok());
    }

    #[test]
    fn test_shadow_target_missing() {
        let shadow = ModuleDescriptor::new("acme/legacy", Version::new(1, 0, 0))
            .with_shadow_route("/legacy", "acme/ghost");
        let mut table = RouteTable::new();
        table.insert_module(&shadow).unwrap();
        let failures = table.finalize();
        assert!(matches!(
            failures[0].1,
            RegistrationError::ShadowTargetMissing { .. }
        ));
    }

    #[test]
    fn test_not_found() {
        let table = table_with(&[blog()]);
        let err = table.resolve("/nowhere").unwrap_err();
        assert_eq!(err.path, "/nowhere");
    }
}
