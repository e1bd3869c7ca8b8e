use url::form_urlencoded;

/// Normalize URL by adding the appropriate scheme if missing
pub fn normalize_url_scheme(url_str: &str) -> String {
    let trimmed_url = url_str.trim();
    if let Some((scheme, _)) = trimmed_url.split_once("://")
        && !scheme.is_empty()
        && scheme.chars().all(|c| c.is_ascii_alphanumeric() || "+-.".contains(c))
    {
        return trimmed_url.to_string();
    }

    if let Some(colon_pos) = trimmed_url.rfind(':')
        && let Some(port_str) = trimmed_url.get(colon_pos + 1..)
    {
        // Ensure what follows ':' is a valid port number and not part of the path
        if !port_str.is_empty() && port_str.chars().all(|c| c.is_ascii_digit()) {
            if port_str == "80" {
                return format!("http://{}", trimmed_url);
            }
            return format!("https://{}", trimmed_url);
        }
    }

    format!("https://{}", trimmed_url)
}

/// Percent-encode a value so it fits in a single path segment.
///
/// Only ASCII alphanumerics and `*-._` pass through; spaces become `%20`.
pub fn encode_path_segment(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Replace the value of `key` in a URL query string with `mask`.
pub fn mask_query_param(url: &str, key: &str, mask: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };

    let masked = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((name, _)) if name == key => format!("{}={}", name, mask),
            _ => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&");
    format!("{}?{}", base, masked)
}
