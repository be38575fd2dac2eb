//! Display model container information.
//!
//! Inspects a `.senm` model image and prints its header fields and
//! parameter count.
//!
//! # Run
//!
//! ```bash
//! cargo run --example model_info -- --help
//! cargo run --example model_info -- model.senm
//! cargo run --example model_info -- --demo
//! ```

use clap::Parser;
use edge_sentinel::model::ModelImage;
use edge_sentinel::synth;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "model-info")]
#[command(about = "Display model container information")]
#[command(version)]
struct Args {
    /// Path to the model image file
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Use demo mode with a generated sample model
    #[arg(long)]
    demo: bool,
}

fn main() -> edge_sentinel::Result<()> {
    let args = Args::parse();

    let image = match args.path.as_ref() {
        Some(path) if !args.demo => {
            println!("Reading: {}\n", path.display());
            ModelImage::from_file(path)?
        }
        _ => {
            println!("(demo mode: generated 160x16 model)\n");
            ModelImage::from_bytes(&synth::random_model(42, 160, 16))?
        }
    };

    println!("=== Model Info ===\n");
    println!("Schema:      {}.{}", image.version().0, image.version().1);
    println!("Input dim:   {}", image.input_dim());
    println!("Hidden dim:  {}", image.hidden_dim());
    println!("Parameters:  {}", image.weights().len());
    println!(
        "Quantized:   {}",
        if image.is_quantized() { "yes" } else { "no" }
    );

    Ok(())
}
