use clap::Parser;
use fare_tracker::config::sources::SourcesConfig;
use fare_tracker::core::aggregator::Aggregator;
use fare_tracker::domain::model::{Query, SourceStatus};
use fare_tracker::sources::build_sources;
use fare_tracker::utils::logger;
use fare_tracker::CliConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);
    tracing::info!("Starting fare-tracker CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // The only user-visible error: everything past this point degrades
    // per source instead of failing the run.
    let query = match Query::new(&cli.origin, &cli.destination, cli.date, cli.passengers) {
        Ok(query) => query,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let config = match &cli.config {
        Some(path) => SourcesConfig::load(path)?,
        None => SourcesConfig::default(),
    };
    let timeout = cli
        .timeout_seconds
        .map(std::time::Duration::from_secs)
        .unwrap_or_else(|| config.timeout());

    let sources = build_sources(&config)?;
    let aggregator = Aggregator::new(sources).with_timeout(timeout);

    if !cli.json {
        println!("{}", "=".repeat(60));
        println!(
            "Searching flights from {} to {} on {}",
            query.origin(),
            query.destination(),
            query.date()
        );
        println!("Checking {} sources...", aggregator.source_count());
        println!("{}", "=".repeat(60));
        println!();
    }

    let outcome = aggregator.search(&query).await;

    if cli.json {
        let document = serde_json::json!({
            "success": true,
            "count": outcome.offers.len(),
            "flights": outcome.offers,
            "sources": outcome.sources,
        });
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    for report in &outcome.sources {
        match &report.status {
            SourceStatus::Fetched {
                candidates,
                accepted,
            } => println!(
                "✅ {}: {} results, {} usable ({} ms)",
                report.source, candidates, accepted, report.elapsed_ms
            ),
            SourceStatus::Failed { message } => println!("❌ {}: {}", report.source, message),
            SourceStatus::TimedOut => println!("⏱️  {}: timed out", report.source),
        }
    }
    println!();

    if outcome.offers.is_empty() {
        // Deliberately the same wording whether sources listed nothing or
        // all of them failed; the status lines above carry the difference.
        println!("No flights found.");
        return Ok(());
    }

    for (index, offer) in outcome.offers.iter().enumerate() {
        println!("Flight Option {}:", index + 1);
        println!("  Airline: {}", offer.airline);
        println!("  Price: ${}", offer.price);
        println!("  Departure: {}", offer.departure.format("%Y-%m-%d %H:%M"));
        println!("  Arrival: {}", offer.arrival.format("%Y-%m-%d %H:%M"));
        println!("  Source: {}", offer.source);
        println!(
            "  Link: {}",
            offer.booking_link.as_deref().unwrap_or("not available")
        );
        println!();
    }

    let cheapest = &outcome.offers[0];
    let priciest = &outcome.offers[outcome.offers.len() - 1];
    println!("{}", "=".repeat(60));
    println!("Total flights found: {}", outcome.offers.len());
    println!("Cheapest: ${} ({})", cheapest.price, cheapest.source);
    println!("Most expensive: ${} ({})", priciest.price, priciest.source);
    println!("{}", "=".repeat(60));

    Ok(())
}
