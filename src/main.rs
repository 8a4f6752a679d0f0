use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use vectorkit::designer::persistence::read_records;
use vectorkit::{init_logging, Config, HistoryManager, Scene, BUILD_DATE, VERSION};

#[derive(Parser)]
#[command(name = "vectorkit")]
#[command(about = "Inspect VectorKit history files")]
struct Args {
    /// History file written by a JSON snapshot store
    history: PathBuf,

    /// Config file whose history settings are applied (TOML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the scene document of this step instead of the summary
    #[arg(short, long)]
    step: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    init_logging()?;
    let args = Args::parse();
    info!("vectorkit {} (built {})", VERSION, BUILD_DATE);

    let config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };

    let records = read_records(&args.history)
        .with_context(|| format!("reading history {}", args.history.display()))?;
    let history = HistoryManager::from_records(&records, config.history)?;

    if let Some(step) = args.step {
        println!("{}", history.state_text(step)?);
        return Ok(());
    }

    println!(
        "{}: {} steps, ~{} bytes",
        args.history.display(),
        history.history_length(),
        history.memory_usage()
    );
    for (step, entry) in history.entries().iter().enumerate() {
        let mut scene = Scene::new();
        history.restore_state(&mut scene, step)?;
        let kind = match entry.base_index() {
            Some(base) => format!("diff of {base}"),
            None => "full".to_string(),
        };
        println!(
            "  step {:>3}  {:<10} {:>4} objects  {:>7} chars  t={}",
            step,
            kind,
            scene.len(),
            entry.payload().len(),
            entry.timestamp()
        );
    }
    Ok(())
}
