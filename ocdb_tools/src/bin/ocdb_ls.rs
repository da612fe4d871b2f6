use anyhow::Result;
use ocdb_tools::config::Config;
use std::io;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log)?)
        .with_writer(io::stderr)
        .init();

    ocdb_tools::register_types()?;

    let mut out = io::stdout().lock();
    for path in config.paths.iter() {
        if let Err(e) = ocdb_tools::ls(path, config.key_filter.as_ref(), &mut out) {
            tracing::error!(?path, "{e:#}");
            return Err(e);
        }
    }
    Ok(())
}
