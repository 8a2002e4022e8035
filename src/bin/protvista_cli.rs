use anyhow::{Context, Result, anyhow, bail};
use protvista::canvas::HeadlessCanvas;
use protvista::fetch::HttpSource;
use protvista::protocol::{CategoryDescriptor, CategoryTrack, FeaturePayload};
use protvista::{FeatureViewer, ViewerConfig, process_ungrouped_features};
use serde::Serialize;
use std::{env, fs};
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "PROTVISTA_LOG";

#[derive(Serialize)]
struct RegistrySummary<'a> {
    categories: &'a [CategoryDescriptor],
    consequence_types: Vec<&'a str>,
}

fn usage() {
    eprintln!(
        "Usage:\n  \
  protvista_cli --version\n  \
  protvista_cli [--config PATH] tracks '<payload-json>' [--source NAME]\n  \
  protvista_cli [--config PATH] variants '<payload-json>' [--source NAME]\n  \
  protvista_cli [--config PATH] proteomics '<payload-json>'\n  \
  protvista_cli [--config PATH] ungrouped '<payload-json>'\n  \
  protvista_cli [--config PATH] fetch URL [--source NAME]\n  \
  protvista_cli [--config PATH] categories\n  \
  protvista_cli [--config PATH] highlight SEQ_LEN BEGIN END [TYPE] OUTPUT.svg\n\n  \
  Tip: pass @file.json instead of inline JSON"
    );
}

fn init_logging() {
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn load_json_arg(value: &str) -> Result<String> {
    if let Some(path) = value.strip_prefix('@') {
        fs::read_to_string(path).with_context(|| format!("Could not read JSON file '{path}'"))
    } else {
        Ok(value.to_string())
    }
}

fn load_payload(value: &str) -> Result<FeaturePayload> {
    let json = load_json_arg(value)?;
    serde_json::from_str(&json).context("Invalid payload JSON")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Could not serialize JSON output")?;
    println!("{text}");
    Ok(())
}

fn parse_global_config_arg(args: &[String]) -> Result<(ViewerConfig, usize)> {
    if args.len() >= 3 && args[1] == "--config" {
        let config = ViewerConfig::load_from_path(&args[2])?;
        return Ok((config, 3));
    }
    Ok((ViewerConfig::default(), 1))
}

fn source_arg(args: &[String]) -> Option<&str> {
    args.iter()
        .position(|a| a == "--source")
        .and_then(|idx| args.get(idx + 1))
        .map(String::as_str)
}

fn required_arg<'a>(args: &'a [String], idx: usize, what: &str) -> Result<&'a str> {
    match args.get(idx) {
        Some(value) => Ok(value.as_str()),
        None => {
            usage();
            Err(anyhow!("Missing {what}"))
        }
    }
}

fn main() {
    init_logging();
    if let Err(e) = run() {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() <= 1 {
        usage();
        bail!("Missing command");
    }
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("protvista_cli {}", protvista::version());
        return Ok(());
    }

    let (config, cmd_idx) = parse_global_config_arg(&args)?;
    let command = required_arg(&args, cmd_idx, "command")?;
    let source = source_arg(&args);
    let mut viewer = FeatureViewer::new(config);

    let tracks: Vec<CategoryTrack> = match command {
        "tracks" => {
            let payload = load_payload(required_arg(&args, cmd_idx + 1, "payload JSON")?)?;
            viewer.load_features(payload, source)?
        }
        "variants" => {
            let payload = load_payload(required_arg(&args, cmd_idx + 1, "payload JSON")?)?;
            viewer.load_variants(payload, source)?
        }
        "proteomics" => {
            let payload = load_payload(required_arg(&args, cmd_idx + 1, "payload JSON")?)?;
            viewer.load_proteomics(payload)
        }
        "ungrouped" => {
            let payload = load_payload(required_arg(&args, cmd_idx + 1, "payload JSON")?)?;
            process_ungrouped_features(payload.features)?
        }
        "fetch" => {
            let url = required_arg(&args, cmd_idx + 1, "URL")?;
            let http = HttpSource::new()?;
            viewer.fetch_features(&http, url, source)?
        }
        "categories" => {
            let session = viewer.session();
            return print_json(&RegistrySummary {
                categories: session.categories.descriptors(),
                consequence_types: session.consequences.types().collect(),
            });
        }
        "highlight" => {
            let rest: Vec<&str> = args[cmd_idx + 1..].iter().map(String::as_str).collect();
            let (numbers, feature_type, output) = match rest.as_slice() {
                [len, begin, end, output] => ([*len, *begin, *end], "CONTINUOUS", *output),
                [len, begin, end, feature_type, output] => {
                    ([*len, *begin, *end], *feature_type, *output)
                }
                _ => {
                    usage();
                    bail!("highlight requires: SEQ_LEN BEGIN END [TYPE] OUTPUT.svg");
                }
            };
            let sequence_len: usize = numbers[0]
                .parse()
                .with_context(|| format!("Invalid sequence length '{}'", numbers[0]))?;
            let begin: i64 = numbers[1]
                .parse()
                .with_context(|| format!("Invalid begin '{}'", numbers[1]))?;
            let end: i64 = numbers[2]
                .parse()
                .with_context(|| format!("Invalid end '{}'", numbers[2]))?;

            let mut canvas = HeadlessCanvas::new(sequence_len, 1000.0, 40.0);
            let mut feature = protvista::protocol::Feature::region(begin, end);
            feature.feature_type = Some(feature_type.to_string());
            viewer.select_feature(
                &mut canvas,
                std::rc::Rc::new(feature),
                protvista::canvas::ElementHandle(0),
            );
            fs::write(output, canvas.to_svg())
                .with_context(|| format!("Could not write SVG output '{output}'"))?;
            println!("Wrote highlight for {begin}..{end} to '{output}'");
            return Ok(());
        }
        _ => {
            usage();
            bail!("Unknown command '{command}'");
        }
    };
    print_json(&tracks)
}
