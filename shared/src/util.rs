/// Split a comma separated tag string, trimming and dropping empties.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Date part of a backend timestamp (`2024-05-01T10:00:00` -> `2024-05-01`).
pub fn date_part(ts: &str) -> &str {
    ts.split('T').next().unwrap_or(ts)
}

/// Case-insensitive substring test. `needle_lower` must already be lowercase.
pub fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}
