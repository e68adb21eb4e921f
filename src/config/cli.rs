use crate::config::settings::{ConnectionSettings, UspsSettings};
use crate::domain::model::{Address, RateRequest};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "usps-webtools")]
#[command(about = "Query the USPS Web Tools address and rate APIs")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Web Tools endpoint, e.g. https://secure.shippingapis.com/ShippingAPI.dll
    #[arg(long)]
    pub server_url: Option<String>,

    /// Web Tools user id
    #[arg(long)]
    pub user_id: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Standardize an address
    Verify(AddressArgs),
    /// Look up the ZIP+4 for an address
    ZipLookup(AddressArgs),
    /// Look up city and state for a ZIP code
    CityState {
        zip: String,
    },
    /// Domestic postage rates
    Rate {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        /// Weight in ounces
        #[arg(long)]
        weight: String,
        #[arg(long)]
        service: Option<String>,
    },
}

#[derive(Debug, Clone, Args)]
pub struct AddressArgs {
    #[arg(long)]
    pub street1: String,
    #[arg(long, default_value = "")]
    pub street2: String,
    #[arg(long)]
    pub city: String,
    #[arg(long)]
    pub state: String,
    #[arg(long, default_value = "")]
    pub zip: String,
}

impl From<&AddressArgs> for Address {
    fn from(args: &AddressArgs) -> Self {
        Address::new(&args.street1, &args.city, &args.state, &args.zip).with_street2(&args.street2)
    }
}

impl Command {
    pub fn rate_request(&self) -> Option<RateRequest> {
        match self {
            Command::Rate {
                from,
                to,
                weight,
                service,
            } => {
                let request = RateRequest::new(from, to, weight);
                Some(match service {
                    Some(service) => request.with_service(service),
                    None => request,
                })
            }
            _ => None,
        }
    }
}

impl CliConfig {
    /// 命令列參數，作為最高優先的設定來源
    pub fn overrides(&self) -> UspsSettings {
        UspsSettings {
            usps: ConnectionSettings {
                server_url: self.server_url.clone(),
                user_id: self.user_id.clone(),
                timeout_ms: self.timeout_ms,
            },
        }
    }
}
