//! diveo CLI - Record a screen region into a .diveo file.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::error::Error;
use std::fs;
use std::path::Path;
use std::time::Instant;

use diveo::{
    RecordingConfig,
    capture::{CaptureError, FrameSource, Region, SyntheticSource, select_region},
    recorder::record_to_file,
    schema::SourceKind,
};

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.get(1).is_some_and(|a| a == "--help" || a == "-h") {
        eprintln!("Usage: {} [config.json]", args[0]);
        eprintln!();
        eprintln!("Record a screen region into a diveo file.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to recording configuration (default: built-in)");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        return;
    }

    if args.get(1).is_some_and(|a| a == "--example") {
        print_example_config();
        return;
    }

    let config = match args.get(1) {
        Some(path) => load_config(Path::new(path)),
        None => RecordingConfig::default(),
    };

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    let region = match config.region {
        Some(region) => region,
        None => select_region(&config.selector).unwrap_or_else(|e| {
            eprintln!("Error selecting region: {}", with_causes(&e));
            std::process::exit(1);
        }),
    };

    let mut source = open_source(config.source).unwrap_or_else(|e| {
        eprintln!("Error opening frame source: {}", with_causes(&e));
        std::process::exit(1);
    });

    println!("diveo recording");
    println!("===============");
    println!("Region: {}", region);
    println!("Frame rate: {} fps", config.fps);
    println!(
        "Duration: {}s ({} frames)",
        config.duration_secs,
        config.frame_count()
    );
    println!("Output: {}", config.output.display());
    println!();

    let start = Instant::now();
    let stats = record_to_file(&mut *source, region, &config).unwrap_or_else(|e| {
        eprintln!("Recording failed: {}", with_causes(&e));
        std::process::exit(1);
    });

    println!("Done: {}", stats);
    println!("Time: {:.2}s", start.elapsed().as_secs_f32());
}

fn load_config(path: &Path) -> RecordingConfig {
    let config_str = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    })
}

/// Render an error followed by each of its sources.
fn with_causes(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut cause = err.source();
    while let Some(inner) = cause {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        cause = inner.source();
    }
    message
}

fn open_source(kind: SourceKind) -> Result<Box<dyn FrameSource>, CaptureError> {
    match kind {
        SourceKind::Synthetic => Ok(Box::new(SyntheticSource::new())),
        #[cfg(feature = "screen")]
        SourceKind::Screen => Ok(Box::new(diveo::capture::ScreenSource::primary()?)),
        #[cfg(not(feature = "screen"))]
        SourceKind::Screen => Err(CaptureError::Unavailable(
            "built without the `screen` feature; use \"source\": \"synthetic\" or rebuild with --features screen",
        )),
    }
}

fn print_example_config() {
    let config = RecordingConfig {
        fps: 30,
        duration_secs: 5,
        region: Some(Region::new(0, 0, 640, 480)),
        source: SourceKind::Synthetic,
        ..Default::default()
    };

    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error generating example config: {}", e),
    }
}
