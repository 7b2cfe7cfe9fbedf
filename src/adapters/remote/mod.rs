//! Remote adapters - Gateways that reach analysis over the network.

mod http_analysis_client;

pub use http_analysis_client::HttpAnalysisClient;
