use regex::Regex;

/// Package allow-list matching over dot-joined module paths.
///
/// A pattern matches when the package is literally prefixed by it, or when it
/// matches as a glob: `*` spans one package segment, `**` spans any number,
/// `?` matches a single character. An empty pattern list matches everything —
/// the default policy is permissive.
pub fn package_matches(patterns: &[String], package: &str) -> bool {
    if patterns.is_empty() {
        return true;
    }
    patterns
        .iter()
        .any(|p| package.starts_with(p.as_str()) || glob_match(p, package))
}

fn glob_match(pattern: &str, package: &str) -> bool {
    match Regex::new(&glob_to_regex(pattern)) {
        Ok(re) => re.is_match(package),
        Err(_) => false,
    }
}

/// Compile a dot-separated glob into an anchored regex.
fn glob_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    out.push('^');
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => {
                if chars.peek() == Some(&'*') {
                    chars.next();
                    out.push_str(".*");
                } else {
                    out.push_str("[^.]*");
                }
            }
            '?' => out.push('.'),
            c if regex_syntax_char(c) => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push('$');
    out
}

fn regex_syntax_char(c: char) -> bool {
    matches!(
        c,
        '.' | '+' | '(' | ')' | '[' | ']' | '{' | '}' | '^' | '$' | '|' | '\\'
    )
}
