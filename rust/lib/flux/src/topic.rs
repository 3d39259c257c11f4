//! Path pattern matching shared by the router and the subscription list.

/// Match a `/`-separated `path` against `pattern`.
///
/// - `progress/state` matches only itself.
/// - `+` matches exactly one level: `progress/+` matches `progress/state`.
/// - `#` matches the remaining levels (zero or more) and must come last:
///   `pickup/#` matches `pickup`, `pickup/transfer`, `pickup/a/b`.
pub fn matches(pattern: &str, path: &str) -> bool {
    let mut want = pattern.split('/');
    let mut have = path.split('/');

    loop {
        match (want.next(), have.next()) {
            (Some("#"), _) => return true,
            (Some("+"), Some(_)) => {}
            (Some(w), Some(h)) if w == h => {}
            (None, None) => return true,
            _ => return false,
        }
    }
}

/// A pattern is valid when `#` appears only as the final level and no
/// level is empty.
pub fn is_valid(pattern: &str) -> bool {
    let levels: Vec<&str> = pattern.split('/').collect();
    levels.iter().enumerate().all(|(i, level)| {
        !level.is_empty() && (*level != "#" || i == levels.len() - 1)
    })
}
