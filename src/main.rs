use anyhow::Result;
use clap::Parser;

mod adapters;
mod cli;
mod config;
mod credentials;
mod datasets;
mod gateways;
mod progress;

fn main() -> Result<()> {
    env_logger::init();

    let args = cli::Args::parse();
    let mut cfg = config::Config::try_load_from_file_or_default(args.config.as_ref())?;
    cfg.apply_args(&args);

    let gateway_cfg = cfg.geocoding_gateway()?;
    let gateway = gateways::geocoding_gateway(&gateway_cfg, cfg.geocoding.timeout)?;

    datasets::run(
        &cfg.datasets.paths(),
        &cfg.cache.file,
        &gateway,
        cfg.geocoding.delay,
    )?;
    Ok(())
}
