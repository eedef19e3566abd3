//! Person names as written on the sheet tabs.

/// Domain of the synthesized login addresses.
pub const IMPORT_EMAIL_DOMAIN: &str = "scoreboards.import";

/// Splits a display name into first and last name. One token leaves the
/// last name empty; with three or more, everything after the first token is
/// the last name.
pub fn parse_name(full_name: &str) -> (String, String) {
    let mut parts = full_name.split_whitespace();
    let first = parts.next().unwrap_or_default().to_string();
    let last = parts.collect::<Vec<_>>().join(" ");
    (first, last)
}

/// Login address synthesized from a parsed name, lower-cased with spaces removed.
pub fn login_email(first_name: &str, last_name: &str) -> String {
    let local = if last_name.is_empty() {
        first_name.to_lowercase()
    } else {
        format!("{}.{}", first_name.to_lowercase(), last_name.to_lowercase())
    };
    format!("{local}@{IMPORT_EMAIL_DOMAIN}").replace(' ', "")
}

/// Rebuilds the sheet name of a previously imported user.
pub fn display_name(first_name: &str, last_name: Option<&str>) -> String {
    match last_name.filter(|last| !last.is_empty()) {
        Some(last) => format!("{first_name} {last}"),
        None => first_name.to_string(),
    }
}
