use rstock::agents::ConsumerOutcome;
use rstock::logging::init_logging;
use rstock::{SupplyChain, SupplyChainConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    println!("🍺 Starting Cellar Supply Chain Simulation");

    let config = SupplyChainConfig::default();

    println!("Configuration:");
    println!(
        "  Storage units: {} x (cans={}, bottles={})",
        config.unit_count, config.unit_capacity.cans, config.unit_capacity.bottles
    );
    println!(
        "  Consumers: {} (admission pool {}), limit {}..={}",
        config.consumers.count,
        config.consumers.admission_permits,
        config.consumers.min_limit,
        config.consumers.max_limit
    );
    println!(
        "  Intervals: supplier={}ms, restocker={}ms, consumer={}ms",
        config.intervals.supplier_ms, config.intervals.restocker_ms, config.intervals.consumer_ms
    );
    println!("  Open for: {}s", config.run_duration().as_secs());
    println!();

    let report = SupplyChain::run(config)?;

    println!();
    println!("📊 Results:");
    println!(
        "  Supplier: {} batches, {} items",
        report.supplier.batches, report.supplier.items
    );
    println!(
        "  Restocker: {} patrols, {} items still carried",
        report.restocker.passes, report.restocker.surplus_left
    );
    println!(
        "  Consumers done before closing: {}/{}",
        report.completed_consumers(),
        report.consumers.len()
    );
    for consumer in &report.consumers {
        let status = match consumer.outcome {
            ConsumerOutcome::Completed => "done",
            ConsumerOutcome::Closed => "sent home",
        };
        println!(
            "  Consumer[{}] ({}): {}/{} drunk, {} spoiled thrown away, {}",
            consumer.id,
            consumer.preference,
            consumer.consumed,
            consumer.limit,
            consumer.spoiled_discarded,
            status
        );
    }
    for unit in &report.units {
        println!(
            "  Unit[{}]: {} cans, {} bottles left",
            unit.id, unit.cans, unit.bottles
        );
    }
    println!(
        "  Depot: {} items left, {} spoiled purged by the restocker",
        report.depot_remaining, report.ledger.purged
    );

    Ok(())
}
