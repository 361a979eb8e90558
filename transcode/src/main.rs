// SPDX-License-Identifier: Apache-2.0

//! Converts a document between JSON and MessagePack.
//!
//! ```text
//! transcode --from json --to msgpack sensor.json sensor.mp
//! transcode --from msgpack --to pretty sensor.mp
//! ```

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use log::{debug, info};
use picodoc::{
    decode_json_reader, decode_msgpack_reader, encode_json, encode_json_pretty, encode_msgpack,
    measure_json, measure_json_pretty, measure_msgpack, DecodeOptions, Document, IoReader,
    IoWriter, NestingLimit, VariantRef,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    Json,
    Msgpack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
    Msgpack,
}

#[derive(Parser, Debug)]
#[command(version, about = "Convert documents between JSON and MessagePack")]
struct Args {
    /// Format of the input
    #[arg(long, value_enum, default_value_t = InputFormat::Json)]
    from: InputFormat,

    /// Format of the output
    #[arg(long, value_enum, default_value_t = OutputFormat::Msgpack)]
    to: OutputFormat,

    /// Maximum container nesting accepted from the input
    #[arg(long, default_value_t = NestingLimit::DEFAULT.value())]
    nesting_limit: u8,

    /// Print the encoded size instead of the encoded bytes
    #[arg(long)]
    measure: bool,

    /// Input file, `-` for stdin
    input: PathBuf,

    /// Output file, stdout when omitted
    output: Option<PathBuf>,
}

fn open_input(path: &Path) -> io::Result<Box<dyn Read>> {
    if path.as_os_str() == "-" {
        Ok(Box::new(io::stdin().lock()))
    } else {
        Ok(Box::new(File::open(path)?))
    }
}

fn open_output(path: Option<&Path>) -> io::Result<Box<dyn Write>> {
    match path {
        Some(path) => Ok(Box::new(File::create(path)?)),
        None => Ok(Box::new(io::stdout().lock())),
    }
}

fn measure(root: VariantRef<'_>, format: OutputFormat) -> usize {
    match format {
        OutputFormat::Json => measure_json(root),
        OutputFormat::Pretty => measure_json_pretty(root),
        OutputFormat::Msgpack => measure_msgpack(root),
    }
}

fn encode(root: VariantRef<'_>, format: OutputFormat, output: &mut dyn Write) -> usize {
    let writer = IoWriter(output);
    match format {
        OutputFormat::Json => encode_json(root, writer),
        OutputFormat::Pretty => encode_json_pretty(root, writer),
        OutputFormat::Msgpack => encode_msgpack(root, writer),
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let input = match open_input(&args.input) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Error: Unable to open '{}': {}", args.input.display(), e);
            std::process::exit(1);
        }
    };

    let options = DecodeOptions::new().nesting_limit(NestingLimit::new(args.nesting_limit));
    let mut doc = Document::new();
    let reader = IoReader(input);
    let decoded = match args.from {
        InputFormat::Json => decode_json_reader(&mut doc, reader, options),
        InputFormat::Msgpack => decode_msgpack_reader(&mut doc, reader, options),
    };
    if let Err(e) = decoded {
        eprintln!("Error: Decoding '{}' failed: {}", args.input.display(), e);
        std::process::exit(1);
    }
    info!(
        "decoded {} slots, {} strings, {} bytes of pool",
        doc.slot_count(),
        doc.string_count(),
        doc.memory_usage()
    );

    let expected = measure(doc.root(), args.to);
    if args.measure {
        println!("{}", expected);
        return;
    }

    let mut output = match open_output(args.output.as_deref()) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("Error: Unable to create output: {}", e);
            std::process::exit(1);
        }
    };
    let written = encode(doc.root(), args.to, &mut *output);
    debug!("wrote {} of {} bytes", written, expected);
    if written != expected || output.flush().is_err() {
        eprintln!("Error: Output truncated after {} of {} bytes", written, expected);
        std::process::exit(1);
    }
}
