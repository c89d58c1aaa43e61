use clap::Parser;
use tracing::Level;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, filter::Directive, fmt, layer::SubscriberExt,
};

mod cli;

use cli::CLI;

fn init_tracing(log_level: Level) -> eyre::Result<()> {
    let log_filter = EnvFilter::builder()
        .with_default_directive(Directive::from(log_level))
        .from_env_lossy();

    let fmt_layer = fmt::layer().with_writer(std::io::stderr).with_filter(log_filter);
    let subscriber = Registry::default().with(fmt_layer);

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> eyre::Result<()> {
    let CLI { log_level, command } = CLI::parse();
    init_tracing(log_level)?;
    command.run()
}
