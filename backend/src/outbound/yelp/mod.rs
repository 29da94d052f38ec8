//! Upstream business-directory adapter (Yelp Fusion API).

mod http_directory;

pub use http_directory::YelpHttpDirectory;
