use std::collections::HashMap;

use http::Method;

use crate::scan::{BindingLocation, RouteGroupDecl, Verb};

/// One parameter binding of a method descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    pub location: BindingLocation,
}

/// Dispatch metadata for one interface method: verb, path template and
/// parameter bindings. Built once at registration time, never re-derived per
/// call.
#[derive(Debug, Clone)]
pub struct MethodDescriptor {
    pub name: String,
    pub method: Method,
    /// Path template with `{name}` placeholders, relative to the base path
    pub path: String,
    pub bindings: Vec<Binding>,
}

impl MethodDescriptor {
    pub fn new(name: impl Into<String>, method: Method, path: impl Into<String>) -> Self {
        MethodDescriptor {
            name: name.into(),
            method,
            path: path.into(),
            bindings: Vec::new(),
        }
    }

    /// Add a parameter binding (builder style).
    pub fn binding(mut self, name: impl Into<String>, location: BindingLocation) -> Self {
        self.bindings.push(Binding {
            name: name.into(),
            location,
        });
        self
    }

    pub fn find_binding(&self, name: &str) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.name == name)
    }
}

/// Per-interface descriptor table: the static extraction of everything the
/// dispatch pipeline needs, keyed by method name.
#[derive(Debug, Clone, Default)]
pub struct ExchangeDescriptor {
    /// Interface name, e.g. `UserApi`
    pub name: String,
    /// Shared base path from the group marker, empty when absent
    pub base_path: String,
    methods: HashMap<String, MethodDescriptor>,
}

impl ExchangeDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        ExchangeDescriptor {
            name: name.into(),
            base_path: String::new(),
            methods: HashMap::new(),
        }
    }

    pub fn base_path(mut self, base: impl Into<String>) -> Self {
        self.base_path = base.into();
        self
    }

    pub fn route(mut self, method: MethodDescriptor) -> Self {
        self.methods.insert(method.name.clone(), method);
        self
    }

    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.get(name)
    }

    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Derive a descriptor table from a scanned declaration. Only matched
    /// methods (annotated, non-default) become dispatchable routes.
    pub fn from_decl(decl: &RouteGroupDecl) -> Self {
        let mut desc = ExchangeDescriptor::new(decl.name.clone());
        desc.base_path = decl.base_path.clone().unwrap_or_default();
        for m in decl.matched_methods() {
            let verb = m.verb.unwrap_or(Verb::Get);
            let mut md = MethodDescriptor::new(
                m.name.clone(),
                verb.as_method(),
                m.path.clone().unwrap_or_default(),
            );
            for p in &m.params {
                md = md.binding(p.name.clone(), p.location);
            }
            desc = desc.route(md);
        }
        desc
    }
}

/// Join a base path and a method path the way the group/verb markers merge:
/// plain concatenation, with a `/` inserted only when neither side supplies
/// one. A trailing slash meeting a leading slash is kept as written.
pub(crate) fn join_paths(base: &str, path: &str) -> String {
    match (base.is_empty(), path.is_empty()) {
        (true, true) => String::new(),
        (true, false) => path.to_string(),
        (false, true) => base.to_string(),
        (false, false) => {
            if base.ends_with('/') || path.starts_with('/') {
                format!("{base}{path}")
            } else {
                format!("{base}/{path}")
            }
        }
    }
}
