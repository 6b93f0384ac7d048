//! Configuration display command

use anyhow::Result;
use cli_lib::config::{CadenceConfig, DEFAULT_CONFIG_FILE};
use owo_colors::OwoColorize;
use std::path::Path;

pub fn run(config_path: Option<&Path>) -> Result<()> {
    let config = CadenceConfig::load(config_path)?;

    println!("{}", "Cadence Configuration".bold());
    match config_path {
        Some(path) => println!("{}: {}\n", "Location".dimmed(), path.display().dimmed()),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            println!("{}: {}\n", "Location".dimmed(), DEFAULT_CONFIG_FILE.dimmed())
        }
        None => println!("{}: {}\n", "Location".dimmed(), "built-in defaults".dimmed()),
    }

    println!("{}", "[timing]".yellow());
    println!("  {} = {}", "frame_ms".cyan(), config.frame_ms);
    println!("  {} = {}", "throttle_ms".cyan(), config.throttle_ms);
    println!("  {} = {}", "debounce_ms".cyan(), config.debounce_ms);
    println!(
        "  {} = {}",
        "typing_interval_ms".cyan(),
        config.typing_interval_ms
    );
    println!("  {} = {}", "counter_steps".cyan(), config.counter_steps);

    println!("\n{}", "[visibility]".yellow());
    println!("  {} = {}", "threshold".cyan(), config.threshold);
    println!("  {} = {:?}", "root_margin".cyan(), config.root_margin);

    println!("\n{}", "[viewport]".yellow());
    println!(
        "  {} = {}x{}",
        "size".cyan(),
        config.viewport.width,
        config.viewport.height
    );

    println!("\n{}", "[scroll]".yellow());
    println!("  {} = {}", "distance_px".cyan(), config.scroll.distance_px);
    println!("  {} = {}", "duration_ms".cyan(), config.scroll.duration_ms);
    println!(
        "  {} = {}",
        "return_to_top".cyan(),
        config.scroll.return_to_top
    );
    println!("  {} = {}", "jitter_px".cyan(), config.scroll.jitter_px);
    println!("  {} = {}", "seed".cyan(), config.scroll.seed);

    println!("\n{}", "[page]".yellow());
    for element in &config.page {
        println!(
            "  {} ({:?}) top={} height={}",
            element.name.cyan(),
            element.kind,
            element.top,
            element.height
        );
    }

    println!("\n{}", "Valid Ranges:".bold());
    println!("  frame_ms: 1-1000");
    println!("  threshold: 0.0-1.0");
    println!("  root_margin: px-only, 1/2/4 values");

    Ok(())
}
