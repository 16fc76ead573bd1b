//! CLI support for inspecting and producing fronting payloads.
//!
//! The `fronting-decrypt` binary parses arguments and delegates to [`run`],
//! which returns the text to print. Keeping the work here lets tests drive
//! the CLI without spawning a process.

mod error;

use clap::{Parser, Subcommand};
use serde_json::Value;

pub use error::CliError;

use crate::codec::{Decrypted, FrontingPayloadCodec};
use crate::config::CodecSettings;
use crate::error::DecodeError;
use crate::framing::{decode_layers, sanitize};
use crate::record::parse_plaintext;
use crate::url_param::payload_from_url;

/// Number of ciphertext bytes shown by `inspect`.
const HEX_PREVIEW_LEN: usize = 16;

/// `fronting-decrypt` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "fronting-decrypt",
    about = "Decode, inspect, or produce fronting portal payloads",
    version
)]
pub struct Cli {
    /// Key string overriding configuration (16 characters).
    #[arg(long, global = true, value_name = "key")]
    pub key: Option<String>,
    /// IV string overriding configuration (16 characters).
    #[arg(long, global = true, value_name = "iv")]
    pub iv: Option<String>,
    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands of `fronting-decrypt`.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Decode a payload and print the officer record as JSON.
    Decode {
        /// Encoded payload as received in the query string.
        #[arg(required_unless_present = "url")]
        payload: Option<String>,
        /// Full portal URL to read the payload from instead.
        #[arg(long, conflicts_with = "payload")]
        url: Option<String>,
    },
    /// Encrypt and frame an officer JSON object.
    Encode {
        /// Officer JSON, e.g. `{"nippos":"991406965","name":"..."}`.
        #[arg(long)]
        json: String,
    },
    /// Report framing and decryption details without printing plaintext.
    Inspect {
        /// Encoded payload as received in the query string.
        payload: String,
    },
}

/// Execute `cli` against `settings` and return the text to print.
///
/// # Errors
///
/// Returns [`CliError`] for invalid configuration, undecodable payloads, or
/// invalid input JSON.
///
/// # Example
///
/// ```
/// use clap::Parser;
/// use fronting_codec::CodecSettings;
/// use fronting_codec::cli::{Cli, run};
///
/// let settings = CodecSettings::default();
/// let encode = Cli::parse_from([
///     "fronting-decrypt",
///     "encode",
///     "--json",
///     r#"{"nippos":"991406965","name":"CEPI YUDI AFRIZAL"}"#,
/// ]);
/// let payload = run(&encode, &settings).expect("encode");
///
/// let decode = Cli::parse_from(["fronting-decrypt", "decode", payload.as_str()]);
/// let output = run(&decode, &settings).expect("decode");
/// assert!(output.contains("CEPI YUDI AFRIZAL"));
/// ```
pub fn run(cli: &Cli, settings: &CodecSettings) -> Result<String, CliError> {
    let settings = with_overrides(cli, settings);
    let codec = FrontingPayloadCodec::with_default_clock(settings.cipher_params()?);
    match &cli.command {
        Command::Decode { payload, url } => {
            let encoded = resolve_payload(payload.as_deref(), url.as_deref(), &settings)?;
            let record = codec.decode(&encoded)?;
            serde_json::to_string_pretty(&record).map_err(|err| CliError::Serialise {
                message: err.to_string(),
            })
        }
        Command::Encode { json } => encode(&codec, json),
        Command::Inspect { payload } => Ok(inspect(&codec, payload)),
    }
}

fn with_overrides(cli: &Cli, settings: &CodecSettings) -> CodecSettings {
    let mut merged = settings.clone();
    if let Some(key) = &cli.key {
        merged.key = Some(key.clone());
    }
    if let Some(iv) = &cli.iv {
        merged.iv = Some(iv.clone());
    }
    merged
}

fn resolve_payload(
    payload: Option<&str>,
    url: Option<&str>,
    settings: &CodecSettings,
) -> Result<String, CliError> {
    if let Some(payload) = payload {
        return Ok(payload.to_owned());
    }
    let url = url.ok_or(CliError::MissingPayload {
        param: settings.query_param().to_owned(),
    })?;
    payload_from_url(url, settings.query_param())?.ok_or_else(|| CliError::MissingPayload {
        param: settings.query_param().to_owned(),
    })
}

fn encode(codec: &FrontingPayloadCodec, json: &str) -> Result<String, CliError> {
    let value: Value = serde_json::from_str(json).map_err(|err| CliError::InvalidJson {
        message: err.to_string(),
    })?;
    codec
        .record_from_wire(&value)
        .map_err(|err| CliError::InvalidJson {
            message: err.to_string(),
        })?;
    Ok(codec.encode_plaintext(&value.to_string())?)
}

fn inspect(codec: &FrontingPayloadCodec, payload: &str) -> String {
    let mut lines = vec![format!("payload_chars={}", payload.chars().count())];
    if payload.trim().is_empty() {
        lines.push(format!("framing_error={}", DecodeError::EmptyInput));
        return lines.join("\n");
    }
    lines.push(format!("spaces_restored={}", payload.matches(' ').count()));
    let ciphertext = match decode_layers(&sanitize(payload)) {
        Ok(ciphertext) => ciphertext,
        Err(err) => {
            lines.push(format!("framing_error={err}"));
            return lines.join("\n");
        }
    };
    let preview = ciphertext.get(..HEX_PREVIEW_LEN).unwrap_or(&ciphertext);
    lines.push(format!("ciphertext_hex_prefix={}", hex::encode(preview)));
    match codec.decrypt_ciphertext(ciphertext) {
        Ok(decrypted) => {
            lines.push(format!("ciphertext_bytes={}", decrypted.ciphertext_len()));
            lines.push(format!("backend={}", decrypted.backend()));
            lines.push(describe_plaintext(&decrypted));
        }
        Err(err) => lines.push(format!("decrypt_error={err}")),
    }
    lines.join("\n")
}

fn describe_plaintext(decrypted: &Decrypted) -> String {
    let value = match decrypted.plaintext() {
        Ok(text) => parse_plaintext(text),
        Err(err) => return format!("plaintext_error={err}"),
    };
    match value {
        Ok(Value::Object(object)) => {
            let keys: Vec<&str> = object.keys().map(String::as_str).collect();
            format!("json_keys={}", keys.join(","))
        }
        Ok(_) => "plaintext_error=payload JSON must be an object".to_owned(),
        Err(err) => format!("plaintext_error={err}"),
    }
}

#[cfg(test)]
mod tests;
