// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use std::env;

use trail_atlas::{logging, PipelineConfig, PipelineReport, TrailDataset};

fn main() -> Result<()> {
    logging::init_logging();

    let args: Vec<String> = env::args().collect();

    let config = PipelineConfig::discover()?;
    let (dataset, report) = trail_atlas::run(&config).with_context(|| {
        format!(
            "Failed to build trail dataset from {} and {}",
            config.trails_path.display(),
            config.cities_path.display()
        )
    })?;

    if args.len() > 1 && args[1] == "summary" {
        // Summary mode
        print_summary(&dataset, &report);
    } else {
        // UI mode (default)
        run_ui_mode(&dataset)?;
    }

    Ok(())
}

fn print_summary(dataset: &TrailDataset, report: &PipelineReport) {
    println!("🥾 Trail Atlas {}", trail_atlas::VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Run:         {}", report.run_id);
    println!("{}", report.summary());
    println!("World rows:  {} (not shown)", report.world_count);
    println!("References:  {}", report.reference_count);
    println!("Fingerprint: {}", report.fingerprint);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("{:<28} {:>8} {:>12}", "State", "Trails", "Avg score");

    for region in dataset.region_summary() {
        println!(
            "{:<28} {:>8} {:>12.2}",
            region.region_name, region.trail_count, region.mean_review_score
        );
    }
}

#[cfg(feature = "tui")]
fn run_ui_mode(dataset: &TrailDataset) -> Result<()> {
    let mut app = ui::App::new(dataset);
    ui::run_ui(&mut app)?;

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_dataset: &TrailDataset) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or print the dataset summary: trail-atlas summary");
    std::process::exit(1);
}
