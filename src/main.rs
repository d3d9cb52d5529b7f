use clap::Parser;
use gradientmap::{Config, GradientApp};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    setup_logging(config.verbose)?;
    let app = GradientApp::new(config)?;
    app.run()
}
