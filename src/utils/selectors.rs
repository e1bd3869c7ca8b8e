/// Trim CSS selectors and drop the empty ones, keeping their order.
///
/// Entries may themselves be comma-separated, so `["a, b", "c"]` and
/// `["a", "b", "c"]` give the same result.
pub fn clean_selectors<I, S>(selectors: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    selectors
        .into_iter()
        .flat_map(|entry| {
            entry
                .as_ref()
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Join selectors the way the query string expects them, or `None` when
/// there is nothing to send.
pub fn join_selectors(selectors: &[String]) -> Option<String> {
    if selectors.is_empty() {
        None
    } else {
        Some(selectors.join(","))
    }
}
