use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use llsd::{EncoderOptions, LlsdDecoder, LlsdEncoder};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "llsd", version, about = "Convert between JSON and LLSD XML")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Read JSON, write an LLSD XML document
    Encode {
        /// Indent nested elements by this many spaces
        #[arg(long, env = "LLSD_PRETTY")]
        pretty: Option<usize>,

        /// Prepend the XML declaration
        #[arg(long, env = "LLSD_DECLARATION")]
        declaration: bool,

        /// Input file; stdin when omitted
        file: Option<PathBuf>,
    },
    /// Read an LLSD XML document, write JSON
    Decode {
        /// Input file; stdin when omitted
        file: Option<PathBuf>,
    },
}

fn read_input(file: Option<&Path>) -> anyhow::Result<Vec<u8>> {
    let mut buf = Vec::new();
    match file {
        Some(path) => {
            buf = std::fs::read(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
        }
        None => {
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("failed to read stdin")?;
        }
    }
    Ok(buf)
}

fn encode(input: &[u8], options: EncoderOptions) -> anyhow::Result<String> {
    let json: serde_json::Value =
        serde_json::from_slice(input).context("input is not valid JSON")?;
    let value = llsd::from_json(&json);
    Ok(LlsdEncoder::with_options(options).encode(&value))
}

fn decode(input: &[u8]) -> anyhow::Result<String> {
    let value = LlsdDecoder::new()
        .decode_bytes(input)
        .context("input is not an LLSD document")?;
    Ok(serde_json::to_string_pretty(&llsd::to_json(&value))?)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("LLSD_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let args = Args::parse();
    let output = match args.command {
        Command::Encode {
            pretty,
            declaration,
            file,
        } => {
            let input = read_input(file.as_deref())?;
            tracing::debug!(bytes = input.len(), ?pretty, declaration, "encoding");
            encode(
                &input,
                EncoderOptions {
                    xml_declaration: declaration,
                    indent: pretty,
                },
            )?
        }
        Command::Decode { file } => {
            let input = read_input(file.as_deref())?;
            tracing::debug!(bytes = input.len(), "decoding");
            decode(&input)?
        }
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.write_all(b"\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_to_document() {
        let input = br#"{"foo": "bar", "n": [1, 2.5, null]}"#;
        let xml = encode(input, EncoderOptions::default()).unwrap();
        assert_eq!(
            xml,
            "<llsd><map><key>foo</key><string>bar</string><key>n</key>\
             <array><integer>1</integer><real>2.5</real><undef/></array></map></llsd>"
        );
    }

    #[test]
    fn document_to_json() {
        let json =
            decode(b"<llsd><map><key>ok</key><boolean>true</boolean></map></llsd>").unwrap();
        assert_eq!(json, "{\n  \"ok\": true\n}");
    }

    #[test]
    fn bad_input_is_reported() {
        assert!(encode(b"{not json", EncoderOptions::default()).is_err());
        assert!(decode(b"<llsd><map></llsd>").is_err());
    }

    #[test]
    fn args_parse() {
        let argv = ["llsd", "encode", "--pretty", "2", "--declaration", "in.json"];
        let args = Args::try_parse_from(argv).unwrap();
        match args.command {
            Command::Encode {
                pretty,
                declaration,
                file,
            } => {
                assert_eq!(pretty, Some(2));
                assert!(declaration);
                assert_eq!(file, Some(PathBuf::from("in.json")));
            }
            Command::Decode { .. } => panic!("expected encode"),
        }
    }
}
