//! Core of the `logpack-dump` tool: MessagePack in, one JSON document per
//! line out.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use thiserror::Error;

use crate::config::CodecConfig;
use crate::hex::hexify;
use crate::msgpack::{MsgPackError, MsgPackStream, MsgPackToJson, ToJsonError};

#[derive(Debug, Parser)]
#[command(name = "logpack-dump", version, about = "Render MessagePack log records as JSON lines")]
pub struct DumpArgs {
    /// TOML file with codec settings.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Also print a hex dump of every chunk read to stderr.
    #[arg(long)]
    pub hex: bool,

    /// Input file. Reads stdin when omitted or `-`.
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("io: {0}")]
    Io(#[from] io::Error),
    #[error("config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error(transparent)]
    Decode(#[from] MsgPackError),
    #[error(transparent)]
    Convert(#[from] ToJsonError),
    #[error("input ends inside a value ({pending} byte(s) pending, {open} open container(s))")]
    Trailing { pending: usize, open: usize },
}

/// Totals reported after a successful dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpSummary {
    pub documents: usize,
    pub bytes: usize,
}

/// Loads the codec config, falling back to defaults without a path.
pub fn load_config(path: Option<&Path>) -> Result<CodecConfig, CliError> {
    let Some(path) = path else {
        return Ok(CodecConfig::default());
    };
    let text = fs::read_to_string(path)?;
    CodecConfig::from_toml_str(&text).map_err(|source| CliError::Config {
        path: path.to_path_buf(),
        source,
    })
}

/// Streams `input` through the decoder and writes each completed document to
/// `out` as soon as its last byte arrives.
///
/// When `hex_out` is set every chunk read is echoed there as hex first.
pub fn dump<R: Read, W: Write>(
    mut input: R,
    mut out: W,
    mut hex_out: Option<&mut dyn Write>,
    config: &CodecConfig,
) -> Result<DumpSummary, CliError> {
    let mut stream = MsgPackStream::with_capacity(config.read_chunk_size);
    let mut conv = MsgPackToJson::with_config(config);
    let mut chunk = vec![0u8; config.read_chunk_size.max(1)];
    let mut documents = 0;

    loop {
        let n = match input.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };
        if let Some(hex) = hex_out.as_mut() {
            writeln!(hex, "{}", hexify(&chunk[..n]))?;
        }
        stream.push(&chunk[..n]);
        let drained = stream.drain(&mut conv);
        for doc in conv.take_documents() {
            writeln!(out, "{doc}")?;
            documents += 1;
        }
        if let Some(err) = conv.error() {
            out.flush()?;
            return Err(err.clone().into());
        }
        drained?;
    }
    out.flush()?;

    if !stream.is_empty() || conv.open_containers() > 0 {
        return Err(CliError::Trailing {
            pending: stream.pending().len(),
            open: conv.open_containers(),
        });
    }
    tracing::info!(documents, bytes = stream.offset(), "dump complete");
    Ok(DumpSummary {
        documents,
        bytes: stream.offset(),
    })
}

/// Runs the tool for parsed arguments against the process's stdio.
pub fn run(args: &DumpArgs) -> Result<DumpSummary, CliError> {
    let config = load_config(args.config.as_deref())?;
    tracing::debug!(?config, "loaded codec config");
    let stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();
    let hex_out: Option<&mut dyn Write> = if args.hex { Some(&mut stderr) } else { None };
    match args.input.as_deref() {
        Some(path) if path != Path::new("-") => {
            let file = fs::File::open(path)?;
            dump(file, stdout, hex_out, &config)
        }
        _ => dump(io::stdin().lock(), stdout, hex_out, &config),
    }
}
