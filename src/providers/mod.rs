pub mod caching;
pub mod sheets;
