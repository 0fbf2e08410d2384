mod builder;
mod client;
mod dsl;

pub use builder::ElasticsearchEngineBuilder;
pub use client::ElasticsearchEngine;
