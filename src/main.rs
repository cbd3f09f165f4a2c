use nicolink::{
    SourceManager,
    common::{logger, types::AnyResult},
    configs::Config,
};
use tracing::info;

#[tokio::main]
async fn main() -> AnyResult<()> {
    let identifiers: Vec<String> = std::env::args().skip(1).collect();
    if identifiers.is_empty() {
        eprintln!("usage: nicolink <video id or watch url>...");
        std::process::exit(2);
    }

    let config = Config::load()?;
    logger::init(&config);

    let source_manager = SourceManager::new(&config);
    info!("{} source(s) ready", source_manager.sources.len());

    let mut failed = 0usize;
    for identifier in &identifiers {
        match source_manager.get_playback_url(identifier).await {
            Ok(url) => println!("{} -> {}", identifier, url),
            // Already logged by the source manager
            Err(_) => failed += 1,
        }
    }

    if failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}
