use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use usps_webtools::config::cli::Command;
use usps_webtools::utils::logger;
use usps_webtools::utils::validation::Validate;
use usps_webtools::{
    Address, CityState, CliConfig, ErrorCategory, UspsClient, UspsSettings, VerifiedAddress,
    XmlNode, ZipLookupAddress,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting usps-webtools CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 設定來源優先順序：命令列 > 設定檔 > 環境變數
    let mut settings = config.overrides();
    if let Some(path) = &config.config {
        tracing::info!("📁 Loading configuration from: {}", path);
        let file_settings = UspsSettings::from_file(path)
            .with_context(|| format!("failed to load config file '{}'", path))?;
        settings = settings.or(file_settings);
    }
    settings = settings.or(UspsSettings::from_env()?);

    // 驗證配置
    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        eprintln!("💡 Pass --server-url and --user-id, a --config file, or set USPS_SERVER_URL / USPS_USER_ID");
        std::process::exit(1);
    }
    let client = UspsClient::from_settings(settings)?;

    let output = match &config.command {
        Command::Verify(args) => client.verify(&Address::from(args)).await.map(Output::Verified),
        Command::ZipLookup(args) => client
            .zip_code_lookup(&Address::from(args))
            .await
            .map(Output::ZipLookup),
        Command::CityState { zip } => client.city_state_lookup(zip).await.map(Output::CityState),
        Command::Rate { .. } => {
            let request = config
                .command
                .rate_request()
                .context("rate command without rate arguments")?;
            client.rates(&request).await.map(Output::Rates)
        }
    };

    match output {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Err(e) => {
            tracing::debug!("Request failed: {:?}", e);
            eprintln!("❌ {}", e);

            // 依錯誤類別決定退出碼
            let exit_code = match e.category() {
                ErrorCategory::Service => 2,
                ErrorCategory::Network => 3,
                ErrorCategory::Protocol => 4,
                ErrorCategory::Configuration => 1,
            };
            std::process::exit(exit_code);
        }
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum Output {
    Verified(VerifiedAddress),
    ZipLookup(ZipLookupAddress),
    CityState(CityState),
    Rates(XmlNode),
}
