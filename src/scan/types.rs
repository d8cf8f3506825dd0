use std::fmt;

use http::Method;

/// Recognized route-verb markers. The vocabulary is consumed, not defined
/// here: `get_exchange` / `get_mapping` / `get` all name the same verb, and
/// the same goes for the other four.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl Verb {
    /// Map a marker attribute name to a verb, if it is one of the recognized
    /// spellings.
    pub fn from_marker(name: &str) -> Option<Verb> {
        let base = name
            .strip_suffix("_exchange")
            .or_else(|| name.strip_suffix("_mapping"))
            .unwrap_or(name);
        match base {
            "get" => Some(Verb::Get),
            "post" => Some(Verb::Post),
            "put" => Some(Verb::Put),
            "delete" => Some(Verb::Delete),
            "patch" => Some(Verb::Patch),
            _ => None,
        }
    }

    pub fn as_method(&self) -> Method {
        match self {
            Verb::Get => Method::GET,
            Verb::Post => Method::POST,
            Verb::Put => Method::PUT,
            Verb::Delete => Method::DELETE,
            Verb::Patch => Method::PATCH,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_method())
    }
}

/// Where a method parameter is bound in the outgoing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingLocation {
    Path,
    Query,
    Header,
    Body,
}

impl fmt::Display for BindingLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingLocation::Path => write!(f, "Path"),
            BindingLocation::Query => write!(f, "Query"),
            BindingLocation::Header => write!(f, "Header"),
            BindingLocation::Body => write!(f, "Body"),
        }
    }
}

/// One declared method parameter (receiver excluded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamBinding {
    pub name: String,
    /// Declared type, rendered back to source text
    pub ty: String,
    pub location: BindingLocation,
}

/// One declared trait method, annotated or not.
///
/// Methods with a default body are recorded but never synthesized; they
/// already have a usable implementation.
#[derive(Debug, Clone)]
pub struct RouteMethod {
    pub name: String,
    pub verb: Option<Verb>,
    /// Path template from the verb marker, with `{name}` placeholders
    pub path: Option<String>,
    pub params: Vec<ParamBinding>,
    /// Declared return type rendered to source text; `None` for `()`
    pub ret: Option<String>,
    pub has_default_body: bool,
}

impl RouteMethod {
    /// A method matches iff it carries a verb marker and has no default body.
    pub fn matches(&self) -> bool {
        self.verb.is_some() && !self.has_default_body
    }
}

/// A candidate interface: a non-generic trait declaration discovered by the
/// scanner. Immutable for the duration of one generation pass.
#[derive(Debug, Clone)]
pub struct RouteGroupDecl {
    /// Trait name, e.g. `UserApi`
    pub name: String,
    /// Dot-joined module path relative to the scan root, e.g. `example.api`
    pub package: String,
    pub is_public: bool,
    /// Whether the trait itself carries the group-level marker
    pub has_group_marker: bool,
    /// Shared base path from the group marker, if any
    pub base_path: Option<String>,
    pub methods: Vec<RouteMethod>,
}

impl RouteGroupDecl {
    /// `package.Name`, or just `Name` for the root package.
    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }

    /// Methods eligible for stub synthesis and client dispatch.
    pub fn matched_methods(&self) -> impl Iterator<Item = &RouteMethod> {
        self.methods.iter().filter(|m| m.matches())
    }

    /// A base is emitted iff the group marker is present or at least one
    /// method matches. Interfaces with neither produce no output.
    pub fn needs_generation(&self) -> bool {
        self.has_group_marker || self.matched_methods().next().is_some()
    }
}

/// Extract `{name}` placeholder names from a path template, in order.
pub fn path_variables(template: &str) -> Vec<String> {
    let mut vars = Vec::new();
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        vars.push(rest[open + 1..open + close].to_string());
        rest = &rest[open + close + 1..];
    }
    vars
}
