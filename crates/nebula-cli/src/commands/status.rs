use anyhow::Result;
use nebula_etl::Config;
use nebula_search::{ArtifactPaths, Manifest};

pub fn show_status(config: &Config) -> Result<()> {
    let paths = ArtifactPaths::new(&config.model_dir);

    println!("\n📊 Nebula Sound Status\n");
    println!("  Model directory: {}", config.model_dir.display());

    let missing = paths.missing();
    if !missing.is_empty() {
        println!("  Missing artifacts:");
        for path in &missing {
            println!("    - {}", path.display());
        }
        println!("\n  Run `nebula train` to build the model");
        return Ok(());
    }

    let manifest = Manifest::load(&paths.manifest())?;
    println!("  Trained at: {}", manifest.trained_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("  Songs: {}", manifest.rows);
    println!("  Vocabulary: {} terms", manifest.vocabulary_size);
    println!("  Neighbors: {}", manifest.neighbors);

    Ok(())
}
