#![cfg(not(tarpaulin_include))]

use clap::Parser;
use eor_dashboard::app;
use eor_dashboard::config::Config;
use eor_dashboard::loader::load_dashboard_data;
use eor_dashboard::render::{Dashboard, InfoPanel};

/// Main entry point for the dashboard
///
/// Loads both tables from the workbook (a load error stops the process before
/// anything is served), then either writes the page to `--export` or starts
/// the web server.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();

    let data = match load_dashboard_data(&config.workbook) {
        Ok(data) => data,
        Err(e) => {
            log::error!("{}", e);
            return Err(e.into());
        }
    };

    let info = InfoPanel {
        author: config.author.clone(),
        contacts: config.contacts.clone(),
    };
    let dashboard = Dashboard::new(
        data,
        config.workbook.clone(),
        config.download_file.clone(),
        info,
    );

    if let Some(path) = &config.export {
        dashboard.export(path)?;
        return Ok(());
    }

    app::run(dashboard, &config.bind_address()).await
}
