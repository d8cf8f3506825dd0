use crate::config::ProcessorConfig;

/// Name of the generated trait for an interface.
///
/// With neither prefix nor suffix configured the default `Base` suffix
/// applies; otherwise the configured affixes are used exactly as given.
pub fn generated_name(interface: &str, config: &ProcessorConfig) -> String {
    if config.prefix.is_empty() && config.suffix.is_empty() {
        format!("{interface}Base")
    } else {
        format!("{}{interface}{}", config.prefix, config.suffix)
    }
}

/// `UserApiBase` → `user_api_base`. Consecutive capitals stay grouped
/// (`HTTPApi` → `httpapi` is acceptable; acronym-splitting is not attempted).
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c.is_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }
    out
}
