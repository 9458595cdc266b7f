//! Scans Chatterino chat logs for image-hosting links.
//!
//! The pipeline runs resolver, parser, extractor, classifier and aggregator in
//! that order. Writing the results is left to a [`ports::LinkExporter`].

pub mod aggregator;
pub mod application;
pub mod domain;
pub mod error;
pub mod extractor;
pub mod parser;
pub mod ports;
pub mod providers;
pub mod resolver;
pub mod utils;

pub use application::{LinkExtractionService, ScanConfig};
pub use domain::{ChannelPattern, ChatEvent, ExportBundle, LinkRecord, ScanStats};
pub use error::ScanError;
pub use providers::ProviderRegistry;
