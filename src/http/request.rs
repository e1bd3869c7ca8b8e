use reqwest::Client;
use serde::Serialize;
use url::Url;

use crate::constants::{HTTP_VERSION_1_1, HTTP_VERSION_2, MASKED_SECRET, READ_ENDPOINT};
use crate::error::RequestError;
use crate::http::headers::parse_headers;
use crate::model::ExtractionRequest;
use crate::types::{OutputFormat, RequestMethod};
use crate::utils::{encode_path_segment, join_selectors, mask_query_param};

/// A Reader API call, fully resolved but not yet sent.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: RequestMethod,
    pub url: Url,
    /// Sent as `Authorization: Bearer ...` (POST only).
    pub bearer_token: Option<String>,
    /// JSON body (POST only).
    pub body: Option<serde_json::Value>,
}

/// JSON body of `POST {api_base}/read`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReadPayload<'a> {
    url: &'a str,
    format: OutputFormat,
    include_images: bool,
    include_videos: bool,
    include_position: bool,
    #[serde(rename = "onlyCSSSelectors", skip_serializing_if = "no_selectors")]
    only_css_selectors: &'a [String],
    #[serde(rename = "waitForCSSSelectors", skip_serializing_if = "no_selectors")]
    wait_for_css_selectors: &'a [String],
    #[serde(rename = "excludeCSSSelectors", skip_serializing_if = "no_selectors")]
    exclude_css_selectors: &'a [String],
    link_summary: bool,
}

fn no_selectors(selectors: &&[String]) -> bool {
    selectors.is_empty()
}

fn bool_param(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Build the Reader API call for an extraction request
pub fn build_api_request(
    api_base: &str,
    request: &ExtractionRequest,
) -> Result<ApiRequest, RequestError> {
    let api_base = api_base.trim_end_matches('/');
    match request.method() {
        RequestMethod::Get => {
            let raw = format!("{}/{}", api_base, encode_path_segment(request.target_url()));
            let mut url =
                Url::parse(&raw).map_err(|e| RequestError::InvalidApiBase(e.to_string()))?;
            {
                let mut query = url.query_pairs_mut();
                query
                    .append_pair("apiKey", request.api_key())
                    .append_pair("format", request.format().as_str())
                    .append_pair("includeImages", bool_param(request.include_images()))
                    .append_pair("includeVideos", bool_param(request.include_videos()))
                    .append_pair("includePosition", bool_param(request.include_position()));
                let selector_params = [
                    ("onlyCSSSelectors", request.only_css_selectors()),
                    ("waitForCSSSelectors", request.wait_css_selectors()),
                    ("excludeCSSSelectors", request.exclude_css_selectors()),
                ];
                for (name, selectors) in selector_params {
                    if let Some(joined) = join_selectors(selectors) {
                        query.append_pair(name, &joined);
                    }
                }
                query.append_pair("linkSummary", bool_param(request.link_summary()));
            }

            Ok(ApiRequest {
                method: RequestMethod::Get,
                url,
                bearer_token: None,
                body: None,
            })
        }
        RequestMethod::Post => {
            let url = Url::parse(&format!("{}/{}", api_base, READ_ENDPOINT))
                .map_err(|e| RequestError::InvalidApiBase(e.to_string()))?;
            let payload = ReadPayload {
                url: request.target_url(),
                format: request.format(),
                include_images: request.include_images(),
                include_videos: request.include_videos(),
                include_position: request.include_position(),
                only_css_selectors: request.only_css_selectors(),
                wait_for_css_selectors: request.wait_css_selectors(),
                exclude_css_selectors: request.exclude_css_selectors(),
                link_summary: request.link_summary(),
            };
            let body = serde_json::to_value(&payload)
                .map_err(|e| RequestError::InvalidPayload(e.to_string()))?;

            Ok(ApiRequest {
                method: RequestMethod::Post,
                url,
                bearer_token: Some(request.api_key().to_string()),
                body: Some(body),
            })
        }
    }
}

/// Turn an API call into a reqwest builder
pub fn build_request(client: &Client, api_request: &ApiRequest) -> reqwest::RequestBuilder {
    let mut request_builder = match api_request.method {
        RequestMethod::Get => client.get(api_request.url.clone()),
        RequestMethod::Post => client.post(api_request.url.clone()),
    };

    if let Some(token) = &api_request.bearer_token {
        request_builder = request_builder.bearer_auth(token);
    }

    if let Some(body) = &api_request.body {
        request_builder = request_builder.json(body);
    }

    request_builder
}

/// Format an API call as raw HTTP for display, with the API key masked
pub fn format_raw_request(
    api_request: &ApiRequest,
    http2: bool,
    custom_headers: Option<&[String]>,
) -> String {
    let url = &api_request.url;
    let path_and_query = mask_query_param(
        &match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        },
        "apiKey",
        MASKED_SECRET,
    );
    let version = if http2 {
        HTTP_VERSION_2
    } else {
        HTTP_VERSION_1_1
    };
    let mut raw_req = format!(
        "{} {} {}\n",
        api_request.method.as_str(),
        path_and_query,
        version
    );
    raw_req.push_str(&format!("Host: {}\n", url.host_str().unwrap_or("")));

    if api_request.bearer_token.is_some() {
        raw_req.push_str(&format!("Authorization: Bearer {}\n", MASKED_SECRET));
    }
    if api_request.body.is_some() {
        raw_req.push_str("Content-Type: application/json\n");
    }

    if let Some(headers) = custom_headers {
        for (name, value) in &parse_headers(headers) {
            raw_req.push_str(&format!(
                "{}: {}\n",
                name,
                value.to_str().unwrap_or("[unprintable]")
            ));
        }
    }

    if let Some(body) = &api_request.body {
        let pretty = serde_json::to_string_pretty(body).unwrap_or_default();
        raw_req.push_str(&format!("\n{}", pretty));
    }

    raw_req
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BASE: &str = "https://api.example.com/web-reader";

    fn query_pairs(url: &Url) -> Vec<(String, String)> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_build_get_request() {
        let request = ExtractionRequest::builder("https://example.com/a?x=1", "secret")
            .only_css_selectors(["article", ".rich_media_content"])
            .build()
            .unwrap();
        let api_request = build_api_request(BASE, &request).unwrap();

        assert_eq!(api_request.method, RequestMethod::Get);
        assert_eq!(
            api_request.url.path(),
            "/web-reader/https%3A%2F%2Fexample.com%2Fa%3Fx%3D1"
        );
        assert_eq!(
            query_pairs(&api_request.url),
            vec![
                ("apiKey".to_string(), "secret".to_string()),
                ("format".to_string(), "markdown".to_string()),
                ("includeImages".to_string(), "true".to_string()),
                ("includeVideos".to_string(), "false".to_string()),
                ("includePosition".to_string(), "false".to_string()),
                ("onlyCSSSelectors".to_string(), "article,.rich_media_content".to_string()),
                ("linkSummary".to_string(), "false".to_string()),
            ]
        );
        assert!(api_request.bearer_token.is_none());
        assert!(api_request.body.is_none());
    }

    #[test]
    fn test_build_get_request_omits_empty_selectors() {
        let request = ExtractionRequest::builder("https://example.com", "k")
            .build()
            .unwrap();
        let api_request = build_api_request(&format!("{}/", BASE), &request).unwrap();
        let names: Vec<String> = query_pairs(&api_request.url)
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert!(!names.iter().any(|n| n.ends_with("CSSSelectors")));
        assert!(api_request.url.as_str().starts_with(BASE));
        assert!(!api_request.url.path().contains("//"));
    }

    #[test]
    fn test_build_post_request() {
        let request = ExtractionRequest::builder("https://example.com/a", "secret")
            .method(RequestMethod::Post)
            .format(OutputFormat::Json)
            .include_videos(true)
            .wait_css_selectors(["#main"])
            .link_summary(true)
            .build()
            .unwrap();
        let api_request = build_api_request(BASE, &request).unwrap();

        assert_eq!(api_request.url.as_str(), format!("{}/read", BASE));
        assert_eq!(api_request.bearer_token.as_deref(), Some("secret"));
        assert_eq!(
            api_request.body,
            Some(json!({
                "url": "https://example.com/a",
                "format": "json",
                "includeImages": true,
                "includeVideos": true,
                "includePosition": false,
                "waitForCSSSelectors": ["#main"],
                "linkSummary": true,
            }))
        );
    }

    #[test]
    fn test_build_request_rejects_bad_base() {
        let request = ExtractionRequest::builder("https://example.com", "k")
            .build()
            .unwrap();
        assert!(matches!(
            build_api_request("not a base", &request),
            Err(RequestError::InvalidApiBase(_))
        ));
    }

    #[test]
    fn test_format_raw_request_masks_secrets() {
        let request = ExtractionRequest::builder("https://example.com", "secret")
            .build()
            .unwrap();
        let raw = format_raw_request(&build_api_request(BASE, &request).unwrap(), false, None);
        assert!(raw.starts_with("GET /web-reader/"));
        assert!(raw.contains("apiKey=********"));
        assert!(raw.contains("Host: api.example.com"));
        assert!(!raw.contains("secret"));

        let request = ExtractionRequest::builder("https://example.com", "secret")
            .method(RequestMethod::Post)
            .build()
            .unwrap();
        let headers = vec!["X-Trace: 1".to_string()];
        let raw = format_raw_request(
            &build_api_request(BASE, &request).unwrap(),
            true,
            Some(&headers),
        );
        assert!(raw.starts_with("POST /web-reader/read HTTP/2.0"));
        assert!(raw.contains("Authorization: Bearer ********"));
        assert!(raw.contains("x-trace: 1"));
        assert!(raw.contains("\"url\": \"https://example.com\""));
        assert!(!raw.contains("secret"));
    }
}
