use clap::Parser;
use roster::{
    cli::Cli,
    configuration::get_configuration,
    telemetry::{get_subscriber, init_subscriber, shutdown_telemetry},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let configuration = get_configuration()?;

    let subscriber = get_subscriber(
        "roster".into(),
        "info".into(),
        std::io::stdout,
        configuration.telemetry.otlp_endpoint.clone(),
    )?;
    init_subscriber(subscriber)?;

    let result = cli.execute(configuration).await;
    if let Err(e) = &result {
        tracing::error!("{:?}", e);
    }

    shutdown_telemetry();
    result
}
