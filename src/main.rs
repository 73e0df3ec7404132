use rosterbot::service::RosterHandle;
use rosterbot::startup;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting rosterbot");

    // Load configuration
    let config = startup::load_config()?;

    // Open the store and start the roster actor
    let store = startup::open_store(&config.store);
    let roster = RosterHandle::new(store, config.staff.clone(), config.seeds.clone());

    #[cfg(feature = "web-interface")]
    startup::serve(&config, roster).await?;

    #[cfg(not(feature = "web-interface"))]
    {
        println!("Web interface feature not enabled. Please compile with --features web-interface");
        roster.shutdown().await?;
    }

    Ok(())
}
