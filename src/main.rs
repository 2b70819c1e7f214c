//! canvacard - render a social card described by a TOML file

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use log::{debug, info};

use canvacard::config::{CardFile, Settings};
use canvacard::{EmojiResolver, FontBook, HttpFetcher, Renderer};

/// Print help message
fn print_help() {
    println!(
        r#"canvacard {} - social card renderer

USAGE:
    canvacard <CARD.toml> [OPTIONS]

OPTIONS:
    -o, --output <FILE>     Output PNG path (default: canvacard_<timestamp>.png)
    -h, --help              Print this help message
    -V, --version           Print version information

CARD FILE:
    kind = "welcome"        # welcome | leave | tweet
    avatar = "https://..."

    [welcome]               # title, description, background_type,
                            # background, overlay_opacity, border, ...
    [tweet]                 # display_name, username, comment, theme,
                            # verified, icon_dir

CONFIG FILE:
    ~/.config/canvacard/config.toml (or $CANVACARD_CONFIG)
"#,
        env!("CARGO_PKG_VERSION")
    );
}

struct Args {
    card: PathBuf,
    output: PathBuf,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut card = None;
    let mut output = None;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-o" | "--output" => {
                let path = iter.next().ok_or_else(|| anyhow!("{} needs a file path", arg))?;
                output = Some(PathBuf::from(path));
            }
            other if other.starts_with('-') => return Err(anyhow!("Unknown option: {}", other)),
            other => card = Some(PathBuf::from(other)),
        }
    }

    let card = card.ok_or_else(|| anyhow!("Missing card file (see --help)"))?;
    let output = output.unwrap_or_else(|| {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        PathBuf::from(format!("canvacard_{}.png", timestamp))
    });
    Ok(Args { card, output })
}

async fn run(args: Args) -> Result<()> {
    let settings = Settings::load();
    let spec = CardFile::load(&args.card)?
        .into_spec()
        .with_context(|| format!("Invalid card file: {}", args.card.display()))?;
    debug!("Card: {:?}", spec);

    let fetcher = HttpFetcher::new(settings.network.timeout(), &settings.network.user_agent)?;
    let source = settings.emoji.build_source(fetcher.clone());
    info!("Emoji source: {}", source.name());

    let fonts = Arc::new(FontBook::new());
    if !settings.font.path.is_empty() {
        let face = fonts
            .register_font(&settings.font.path, "fallback")
            .await
            .with_context(|| format!("Failed to load fallback font: {}", settings.font.path))?;
        fonts.set_fallback(face);
    }

    let renderer = Renderer::new(fetcher, EmojiResolver::new(source), fonts);
    let png = renderer.render(&spec).await?;

    std::fs::write(&args.output, &png)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    println!("{}", args.output.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();

    // --help
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    // --version
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("canvacard {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let args = parse_args(&args)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    runtime.block_on(run(args))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("canvacard")
            .chain(args.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_args_output() {
        let args = parse_args(&argv(&["card.toml", "-o", "out.png"])).unwrap();
        assert_eq!(args.card, PathBuf::from("card.toml"));
        assert_eq!(args.output, PathBuf::from("out.png"));
    }

    #[test]
    fn test_parse_args_default_output() {
        let args = parse_args(&argv(&["card.toml"])).unwrap();
        let name = args.output.to_string_lossy().into_owned();
        assert!(name.starts_with("canvacard_"));
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse_args(&argv(&[])).is_err());
        assert!(parse_args(&argv(&["card.toml", "--output"])).is_err());
        assert!(parse_args(&argv(&["--bogus", "card.toml"])).is_err());
    }
}
