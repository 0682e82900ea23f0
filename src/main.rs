use clap::Parser;
use mkusers::utils::{logger, validation::Validate};
use mkusers::{
    read_name_list, AccountProvisioner, CliConfig, SystemDirectory, SystemTools, ToolsConfig,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // 參數數量錯誤時 clap 會印出 usage 並以非零狀態結束
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);
    tracing::debug!("CLI config: {:?}", cli);

    let tools_config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading tool configuration from: {}", path.display());
            ToolsConfig::from_file(path)?
        }
        None => ToolsConfig::default(),
    };

    if let Err(e) = tools_config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let names = match read_name_list(&cli.names_file).await {
        Ok(names) => names,
        Err(e) => {
            eprintln!("❌ Failed to read '{}': {}", cli.names_file.display(), e);
            std::process::exit(1);
        }
    };

    let tools = SystemTools::new(&tools_config);
    let directory = SystemDirectory::from_config(&tools_config);
    let mut provisioner = AccountProvisioner::new(tools, directory);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    provisioner.provision_from_names(&names, &mut out).await?;

    Ok(())
}
