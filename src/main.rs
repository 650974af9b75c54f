//! Red List pipeline runner
//!
//! Thin rendering layer over the pipeline core: runs one full pass and
//! prints the selected region, the critically endangered species with their
//! conservation measures, and the mammal subset.

use std::sync::Arc;

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use redlist_pipeline::pipeline::StageState;
use redlist_pipeline::{Config, Coordinator, PipelineSnapshot, RedListClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    let config = Config::from_env()?;
    let catalog = Arc::new(RedListClient::new(&config));
    let coordinator = Coordinator::new(catalog);

    let snapshot = coordinator.run().await;
    render(&snapshot);

    Ok(())
}

fn render(snapshot: &PipelineSnapshot) {
    println!("\nRANDOM REGION");
    match &snapshot.region {
        StageState::Fetched(region) => println!("  {region}"),
        StageState::Failed(err) => println!("  no data ({err})"),
        _ => println!("  Loading..."),
    }

    println!("\nCRITICALLY ENDANGERED SPECIES");
    match &snapshot.species {
        StageState::Fetched(_) if snapshot.cr_species().is_empty() => {
            println!("  none in this region");
        }
        StageState::Fetched(_) => {
            for species in snapshot.cr_species() {
                let measures = match species.conservation_measures.as_deref() {
                    Some("") => "(no measures recorded)",
                    Some(measures) => measures,
                    None => "(measures pending)",
                };
                println!("  {} [{}]: {}", species.scientific_name, species.id, measures);
            }
            if let Some(err) = snapshot.enrichment.error() {
                println!("  measures unavailable ({err})");
            }
        }
        StageState::Failed(err) => println!("  no data ({err})"),
        _ => println!("  Loading..."),
    }

    println!("\nMAMMALS IN REGION");
    match &snapshot.mammals {
        StageState::Fetched(mammals) if mammals.is_empty() => println!("  none found"),
        StageState::Fetched(mammals) => {
            for species in mammals {
                println!("  {} [{}]", species.scientific_name, species.id);
            }
        }
        StageState::Failed(err) => println!("  no data ({err})"),
        _ => println!("  Loading..."),
    }
}
