use std::path::Path;

use graytone_rs::image_pipeline::{ExportConfig, GrayscalePipeline, OutputFormat, TransformMode};
use graytone_rs::logger;

use tracing::{error, info};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logger::init();

    info!("Starting graytone...");

    let mut args = std::env::args().skip(1);
    let input = args.next().unwrap_or_else(|| "input.png".to_string());
    let output = args.next().unwrap_or_else(|| "output_grayscale.png".to_string());
    let mode: TransformMode = match args.next() {
        Some(name) => name.parse()?,
        None => TransformMode::default(),
    };

    let format: OutputFormat = Path::new(&output)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("png")
        .parse()?;
    let config = ExportConfig::builder().format(format).build();
    let pipeline = GrayscalePipeline::new(mode, config);

    info!("Grayscale conversion pipeline initialized");
    info!("Mode: {}", pipeline.mode().as_str());
    info!("Format: {}", pipeline.config().format.as_str());

    match pipeline.convert_file(&input, &output) {
        Ok(_) => info!("Conversion successful!"),
        Err(e) => error!("Conversion failed: {}", e),
    }

    Ok(())
}
