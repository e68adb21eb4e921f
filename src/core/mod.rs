pub mod client;
pub mod envelope;
pub mod extractor;
pub mod facade;
pub mod operation;
pub mod transport;
pub mod xml_tree;

pub use crate::domain::model::{Address, CityState, RateRequest, VerifiedAddress, ZipLookupAddress};
pub use crate::domain::ports::Transport;
pub use crate::utils::error::Result;
