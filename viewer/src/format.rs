use glt_discovery::ResultFile;

/// upper-case the first character, leave the rest untouched
pub fn capitalize(input: &str) -> String {
    let mut chars = input.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Human readable label of a result file, e.g. `DB: Cockroach, Strategy: lock, Cache: cache`
pub fn format_filename(file: &ResultFile) -> String {
    format!(
        "DB: {}, Strategy: {}, Cache: {}",
        capitalize(file.database()),
        file.strategy(),
        file.cache_mode()
    )
}

/// Only the first hyphen becomes a space: `crawl-and-update` -> `Crawl and-update`
pub fn format_test_type(name: &str) -> String {
    capitalize(&name.replacen('-', " ", 1))
}
