pub mod delay;
pub mod selectors;
pub mod url;

pub use delay::{jitter, parse_retry_after, wait};
pub use selectors::{clean_selectors, join_selectors};
pub use url::{encode_path_segment, mask_query_param, normalize_url_scheme};
