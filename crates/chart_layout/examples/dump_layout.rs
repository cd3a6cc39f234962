//! Compute a layout for a sample chart and print it as JSON.
//!
//! Run with `RUST_LOG=chart_layout=debug` to see the solver's decisions.

use anyhow::Result;
use chart_layout::LayoutEngine;
use chart_model::{AvailableSpace, ChartKind, ChartSpec, Dataset, GridConfig};
use text_metrics::RenderTarget;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut chart = ChartSpec::new(ChartKind::Pie)
        .with_title("Market share")
        .with_labels(vec![
            "Alpha Corp".into(),
            "Beta Industries".into(),
            "Gamma Group".into(),
            "Other".into(),
        ]);
    chart.add_dataset(Dataset::new("share", vec![42.0, 31.0, 19.0, 8.0]));

    let mut engine = LayoutEngine::new();
    let layout = engine.compute_layout(
        &chart,
        &GridConfig::default(),
        AvailableSpace::new(800.0, 600.0),
        RenderTarget::Screen,
    )?;

    println!("{}", serde_json::to_string_pretty(&layout)?);
    Ok(())
}
