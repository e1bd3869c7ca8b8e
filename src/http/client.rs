use anyhow::Result;
use reqwest::{Client, redirect::Policy};

use crate::config::ReaderConfig;
use crate::constants::{DEFAULT_REDIRECT_LIMIT, USER_AGENT};
use crate::http::headers::parse_headers;

/// Build HTTP client from reader configuration
pub fn build_http_client(config: &ReaderConfig) -> Result<Client> {
    let default_headers = parse_headers(&config.headers);

    let mut client_builder = Client::builder()
        .timeout(config.timeout)
        .redirect(Policy::limited(DEFAULT_REDIRECT_LIMIT))
        .user_agent(USER_AGENT)
        .default_headers(default_headers);

    if !config.verify_ssl {
        client_builder = client_builder.danger_accept_invalid_certs(true);
    }

    if let Some(proxy_url) = &config.proxy {
        let proxy = reqwest::Proxy::all(proxy_url)?;
        client_builder = client_builder.proxy(proxy);
    }

    if !config.http2 {
        client_builder = client_builder.http1_only();
    }

    Ok(client_builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client_default() {
        assert!(build_http_client(&ReaderConfig::default()).is_ok());
    }

    #[test]
    fn test_build_http_client_with_options() {
        let config = ReaderConfig {
            verify_ssl: false,
            http2: true,
            headers: vec!["X-Client: webreader".to_string()],
            ..ReaderConfig::default()
        };
        assert!(build_http_client(&config).is_ok());
    }
}
