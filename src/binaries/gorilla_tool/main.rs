mod logging;
mod points;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use gorilla_codec::{Compression, EncodeOptions};
use serde::{Deserialize, Serialize};

use crate::points::Points;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Parser)]
#[clap(about, version, author)]
struct Config {
    /// Log directives used when RUST_LOG is not set.
    #[clap(long, default_value = "warn")]
    pub log: String,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Subcommand)]
enum Command {
    /// Encode a JSON series into a block.
    Encode {
        #[clap(long)]
        input: PathBuf,
        #[clap(long)]
        output: PathBuf,
        #[clap(long, value_enum, default_value_t = CompressionArg::None)]
        compression: CompressionArg,
    },
    /// Decode a block and print it as JSON.
    Decode {
        #[clap(long)]
        input: PathBuf,
    },
    /// Print the header of a block.
    Inspect {
        #[clap(long)]
        input: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
enum CompressionArg {
    None,
    Snappy,
}

impl From<CompressionArg> for Compression {
    fn from(c: CompressionArg) -> Self {
        match c {
            CompressionArg::None => Compression::None,
            CompressionArg::Snappy => Compression::Snappy,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    logging::setup_logging(&config.log);
    tracing::debug!(?config, "parsed config");

    match config.command {
        Command::Encode {
            input,
            output,
            compression,
        } => encode(&input, &output, compression.into()),
        Command::Decode { input } => decode(&input),
        Command::Inspect { input } => inspect(&input),
    }
}

fn encode(input: &Path, output: &Path, compression: Compression) -> anyhow::Result<()> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let points: Points = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse {}", input.display()))?;
    let series = points.into_series()?;

    let opts = EncodeOptions::new().with_compression(compression);
    tracing::debug!(options = %serde_json::to_string(&opts)?, "encoding");

    let block = gorilla_codec::encode(&series, &opts).context("failed to encode series")?;
    fs::write(output, &block)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "encoded {} points into {} bytes",
        series.len(),
        block.len()
    );
    Ok(())
}

fn decode(input: &Path) -> anyhow::Result<()> {
    let block = fs::read(input).with_context(|| format!("failed to read {}", input.display()))?;
    let series = gorilla_codec::decode(&block).context("failed to decode block")?;

    let points = Points::from_series(series);
    println!("{}", serde_json::to_string_pretty(&points)?);
    Ok(())
}

fn inspect(input: &Path) -> anyhow::Result<()> {
    let block = fs::read(input).with_context(|| format!("failed to read {}", input.display()))?;
    let info = gorilla_codec::inspect(&block).context("failed to read block header")?;

    // 8 bytes of timestamp and up to 8 bytes of value per point
    let raw = info.item_count * 16;
    println!("items:            {}", info.item_count);
    println!("value type:       {}", info.value_type);
    println!("snappy wrapped:   {}", info.compressed);
    println!("timestamp bytes:  {}", info.timestamp_len);
    println!("value bytes:      {}", info.value_len);
    println!("block bytes:      {}", info.encoded_len);
    if info.encoded_len > 0 && raw > 0 {
        println!("ratio:            {:.2}", raw as f64 / info.encoded_len as f64);
    }
    Ok(())
}
