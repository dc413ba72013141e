use tracing::debug;

/// Resolve a credential value. A value starting with '$' names a variable
/// looked up through `lookup`; an unset variable leaves the literal in place.
pub fn resolve_credential_with<F>(value: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(var_name) = value.strip_prefix('$') {
        match lookup(var_name) {
            Some(resolved) => {
                debug!(var = %var_name, "Resolved credential from environment");
                resolved
            }
            None => {
                debug!(var = %var_name, "Environment variable not set, using literal");
                value.to_string()
            }
        }
    } else {
        value.to_string()
    }
}

/// Mask a secret for display, keeping at most the last four characters.
pub fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 8 {
        return "[REDACTED]".to_string();
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("****{}", tail)
}
