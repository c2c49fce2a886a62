//! HTTP protocol layer module
//!
//! Protocol-level building blocks for static file serving: MIME inference,
//! path normalisation, byte ranges, conditional requests and response
//! builders. Nothing here knows about routes or roots.

pub mod cache;
pub mod mime;
pub mod path;
pub mod range;
pub mod response;

// Re-export commonly used types
pub use range::parse_range_header;
pub use response::{
    build_304_response, build_400_response, build_403_response, build_404_response,
    build_416_response, build_500_response, build_options_response, build_redirect_response,
    merge_headers,
};
