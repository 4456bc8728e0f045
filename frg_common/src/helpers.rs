/// Interpret a string as a boolean flag. Returns `default` when the value is missing or not recognisable
/// as a boolean.
pub fn parse_boolean_flag(value: Option<&str>, default: bool) -> bool {
    match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("1") | Some("true") | Some("yes") | Some("on") => true,
        Some("0") | Some("false") | Some("no") | Some("off") => false,
        _ => default,
    }
}

/// Read a boolean flag from the environment variable `var`, using `default` when it is unset or garbled.
pub fn env_flag(var: &str, default: bool) -> bool {
    parse_boolean_flag(std::env::var(var).ok().as_deref(), default)
}
