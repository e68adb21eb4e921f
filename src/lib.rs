pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use config::{settings::UspsSettings, ClientConfig};
pub use crate::core::{
    client::UspsClient, envelope::Params, operation::Operation, transport::HttpTransport,
    xml_tree::XmlNode,
};
pub use domain::model::{Address, CityState, RateRequest, VerifiedAddress, ZipLookupAddress};
pub use domain::ports::Transport;
pub use utils::error::{DomainError, ErrorCategory, Result, TransportError, UspsError};
