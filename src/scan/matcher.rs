use anyhow::{bail, Context};
use quote::ToTokens;
use syn::{FnArg, ItemTrait, Pat, ReturnType, TraitItem};

use super::types::{path_variables, BindingLocation, ParamBinding, RouteGroupDecl, RouteMethod, Verb};

/// Marker spellings that flag a whole trait as a route group.
const GROUP_MARKERS: [&str; 2] = ["http_exchange", "request_mapping"];

/// Classify a trait declaration into the scanner's model.
///
/// Fails on declaration errors (a method carrying more than one verb marker);
/// everything else is recorded as-is and judged later by
/// [`RouteGroupDecl::needs_generation`].
pub fn classify_trait(item: &ItemTrait, package: &str) -> anyhow::Result<RouteGroupDecl> {
    let name = item.ident.to_string();

    let mut has_group_marker = false;
    let mut base_path = None;
    for attr in &item.attrs {
        let marker = marker_name(attr);
        if GROUP_MARKERS.contains(&marker.as_str()) {
            has_group_marker = true;
            if let Some(path) = attr_path_value(attr)
                .with_context(|| format!("bad group marker on trait `{name}`"))?
            {
                base_path = Some(path);
            }
        }
    }

    let mut methods = Vec::new();
    for member in &item.items {
        if let TraitItem::Fn(f) = member {
            methods.push(classify_method(f, &name)?);
        }
    }

    Ok(RouteGroupDecl {
        name,
        package: package.to_string(),
        is_public: matches!(item.vis, syn::Visibility::Public(_)),
        has_group_marker,
        base_path,
        methods,
    })
}

fn classify_method(f: &syn::TraitItemFn, trait_name: &str) -> anyhow::Result<RouteMethod> {
    let name = f.sig.ident.to_string();

    let mut verb = None;
    let mut path = None;
    for attr in &f.attrs {
        let Some(v) = Verb::from_marker(&marker_name(attr)) else {
            continue;
        };
        if verb.is_some() {
            bail!("method `{trait_name}::{name}` carries more than one route-verb marker");
        }
        verb = Some(v);
        path = attr_path_value(attr)
            .with_context(|| format!("bad verb marker on `{trait_name}::{name}`"))?;
    }

    let template_vars = path.as_deref().map(path_variables).unwrap_or_default();

    let mut params = Vec::new();
    for input in &f.sig.inputs {
        let FnArg::Typed(pat_type) = input else {
            continue; // receiver
        };
        let Pat::Ident(pat_ident) = pat_type.pat.as_ref() else {
            continue; // patterns other than plain identifiers carry no binding name
        };
        let pname = pat_ident.ident.to_string();
        let location = explicit_binding(&pat_type.attrs).unwrap_or_else(|| {
            if template_vars.contains(&pname) {
                BindingLocation::Path
            } else {
                BindingLocation::Query
            }
        });
        params.push(ParamBinding {
            name: pname,
            ty: render_type(&pat_type.ty),
            location,
        });
    }

    let ret = match &f.sig.output {
        ReturnType::Default => None,
        ReturnType::Type(_, ty) => Some(render_type(ty)),
    };

    Ok(RouteMethod {
        name,
        verb,
        path,
        params,
        ret,
        has_default_body: f.default.is_some(),
    })
}

/// Last path segment of the attribute, so qualified markers
/// (`httpexchange::get_exchange`) are recognized too.
fn marker_name(attr: &syn::Attribute) -> String {
    attr.path()
        .segments
        .last()
        .map(|s| s.ident.to_string())
        .unwrap_or_default()
}

/// Explicit parameter-level binding marker, if present.
fn explicit_binding(attrs: &[syn::Attribute]) -> Option<BindingLocation> {
    for attr in attrs {
        match marker_name(attr).as_str() {
            "path" => return Some(BindingLocation::Path),
            "query" => return Some(BindingLocation::Query),
            "header" => return Some(BindingLocation::Header),
            "body" => return Some(BindingLocation::Body),
            _ => {}
        }
    }
    None
}

/// Extract the path-template argument of a marker attribute.
///
/// Accepts `#[get_exchange("/users/{id}")]`, `#[http_exchange(path = "/api")]`
/// (also the `url =` / `value =` spellings) and `#[get_exchange = "/x"]`.
/// Unknown named arguments are skipped.
fn attr_path_value(attr: &syn::Attribute) -> anyhow::Result<Option<String>> {
    match &attr.meta {
        syn::Meta::Path(_) => Ok(None),
        syn::Meta::NameValue(nv) => {
            if let syn::Expr::Lit(lit) = &nv.value {
                if let syn::Lit::Str(s) = &lit.lit {
                    return Ok(Some(s.value()));
                }
            }
            Ok(None)
        }
        syn::Meta::List(list) => {
            if let Ok(lit) = syn::parse2::<syn::LitStr>(list.tokens.clone()) {
                return Ok(Some(lit.value()));
            }
            let mut found = None;
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("path")
                    || meta.path.is_ident("url")
                    || meta.path.is_ident("value")
                {
                    let lit: syn::LitStr = meta.value()?.parse()?;
                    found = Some(lit.value());
                } else if meta.input.peek(syn::Token![=]) {
                    meta.input.parse::<syn::Token![=]>()?;
                    meta.input.parse::<syn::Expr>()?;
                }
                Ok(())
            })?;
            Ok(found)
        }
    }
}

/// Render a `syn::Type` back to compact source text.
pub fn render_type(ty: &syn::Type) -> String {
    tidy_tokens(&ty.to_token_stream().to_string())
}

/// Collapse the spacing `TokenStream::to_string` inserts between tokens.
fn tidy_tokens(s: &str) -> String {
    let collapsed = s
        .replace(" :: ", "::")
        .replace("< ", "<")
        .replace(" <", "<")
        .replace(" >", ">")
        .replace("& ", "&")
        .replace("( ", "(")
        .replace(" )", ")")
        .replace(" ,", ",");
    // one space after each comma, never two
    collapsed.replace(',', ", ").replace(",  ", ", ").trim().to_string()
}
