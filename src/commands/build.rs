//! Build the static site

use anyhow::Result;

use crate::content::loader::DocumentLoader;
use crate::generator::{BuildReport, Generator};
use crate::Site;

/// Run one full build: load, collect, copy, render
pub fn run(site: &Site, drafts: bool) -> Result<BuildReport> {
    let start = std::time::Instant::now();

    let documents = DocumentLoader::new(site).with_drafts(drafts).load_all()?;
    tracing::info!("Loaded {} documents from {:?}", documents.len(), site.input_dir);

    let mut generator = Generator::new(site)?;
    let report = generator.generate(&documents)?;

    let duration = start.elapsed();
    tracing::info!(
        "Wrote {} pages to {:?} in {:.2}s",
        report.pages_written,
        site.output_dir,
        duration.as_secs_f64()
    );

    Ok(report)
}
