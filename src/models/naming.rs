//! Filesystem-safe names and generated identifiers

/// Turn a medicine name or month label into a filename segment
///
/// Lower-cases, replaces spaces and `/` with `_` and strips commas, so
/// "Tylenol, Extra/Strength" becomes "tylenol_extra_strength".
pub fn safe_segment(name: &str) -> String {
    name.to_lowercase()
        .replace(' ', "_")
        .replace(',', "")
        .replace('/', "_")
}

/// Derive a profile id from a child's name, avoiding ids already taken
///
/// The base id keeps only alphanumerics and underscores; collisions get a
/// numeric suffix (`jane_doe`, `jane_doe_1`, `jane_doe_2`, ...).
pub fn generate_profile_id<F>(child_name: &str, is_taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    let base: String = child_name
        .to_lowercase()
        .replace(' ', "_")
        .replace('.', "")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect();

    let mut candidate = base.clone();
    let mut counter = 1;
    while is_taken(&candidate) {
        candidate = format!("{}_{}", base, counter);
        counter += 1;
    }
    candidate
}
