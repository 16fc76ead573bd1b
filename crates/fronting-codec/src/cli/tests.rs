//! Unit tests for the fronting CLI flow.

use clap::Parser;
use rstest::{fixture, rstest};

use super::*;
use crate::cipher::CtrBackend;
use crate::error::PayloadError;
use crate::params::CipherParams;

const OFFICER_JSON: &str = r#"{"nippos":"991406965","name":"CEPI YUDI AFRIZAL","account_no":"0100031467"}"#;

#[fixture]
fn settings() -> CodecSettings {
    CodecSettings::default()
}

fn run_args(args: &[&str], settings: &CodecSettings) -> Result<String, CliError> {
    let argv = std::iter::once("fronting-decrypt").chain(args.iter().copied());
    let cli = Cli::try_parse_from(argv).expect("arguments parse");
    run(&cli, settings)
}

fn encoded_officer(settings: &CodecSettings) -> String {
    run_args(&["encode", "--json", OFFICER_JSON], settings).expect("encode succeeds")
}

#[rstest]
fn decode_prints_session_json(settings: CodecSettings) {
    let payload = encoded_officer(&settings);
    let output = run_args(&["decode", payload.as_str()], &settings).expect("decode succeeds");
    let value: Value = serde_json::from_str(&output).expect("output is JSON");
    assert_eq!(value["identifier"], "991406965");
    assert_eq!(value["accountNumber"], "0100031467");
    assert!(value.get("retrievedAt").is_some());
}

#[rstest]
fn decode_reads_payload_from_url(settings: CodecSettings) {
    let payload = encoded_officer(&settings);
    let url = format!("https://portal.example/fronting?data={payload}");
    let output = run_args(&["decode", "--url", url.as_str()], &settings).expect("decode succeeds");
    assert!(output.contains("CEPI YUDI AFRIZAL"));
}

#[rstest]
fn decode_honours_configured_query_param(mut settings: CodecSettings) {
    let payload = encoded_officer(&settings);
    settings.query_param = Some("p".to_owned());
    let url = format!("https://portal.example/fronting?data=ignored&p={payload}");
    let output = run_args(&["decode", "--url", url.as_str()], &settings).expect("decode succeeds");
    assert!(output.contains("991406965"));
}

#[rstest]
fn url_without_parameter_is_reported(settings: CodecSettings) {
    let err = run_args(
        &["decode", "--url", "https://portal.example/fronting"],
        &settings,
    )
    .expect_err("must fail");
    assert_eq!(
        err,
        CliError::MissingPayload {
            param: "data".to_owned()
        }
    );
}

#[test]
fn decode_and_url_conflict() {
    let parsed = Cli::try_parse_from([
        "fronting-decrypt",
        "decode",
        "abc",
        "--url",
        "https://portal.example/",
    ]);
    assert!(parsed.is_err());
}

#[rstest]
fn key_override_changes_the_cipher(settings: CodecSettings) {
    let payload = encoded_officer(&settings);
    let err = run_args(
        &["--key", "0123456789abcdef", "decode", payload.as_str()],
        &settings,
    )
    .expect_err("wrong key must fail");
    assert!(matches!(
        err,
        CliError::Decode(DecodeError::InvalidPayloadFormat(_))
    ));
}

#[rstest]
fn short_key_override_is_a_config_error(settings: CodecSettings) {
    let err = run_args(&["decode", "abcd", "--key", "short"], &settings).expect_err("must fail");
    assert!(matches!(err, CliError::Config(_)));
}

#[rstest]
#[case("not json")]
#[case(r#"{"name":"CEPI YUDI AFRIZAL"}"#)]
fn encode_rejects_invalid_officer_json(settings: CodecSettings, #[case] json: &str) {
    let err = run_args(&["encode", "--json", json], &settings).expect_err("must fail");
    assert!(matches!(err, CliError::InvalidJson { .. }));
}

#[rstest]
fn inspect_reports_layers_without_plaintext(settings: CodecSettings) {
    let payload = encoded_officer(&settings);
    let output = run_args(&["inspect", payload.as_str()], &settings).expect("inspect succeeds");
    assert!(output.contains("ciphertext_bytes="));
    assert!(output.contains("backend=stream"));
    assert!(output.contains("json_keys="));
    assert!(output.contains("nippos"));
    assert!(!output.contains("CEPI"));
    assert!(!output.contains("991406965"));
}

#[rstest]
fn inspect_reports_framing_errors(settings: CodecSettings) {
    let output = run_args(&["inspect", "***"], &settings).expect("inspect never fails");
    assert!(output.contains("framing_error=malformed outer base64 layer"));
    assert!(!output.contains("backend="));
}

#[rstest]
fn inspect_reports_wrong_key_as_plaintext_error(settings: CodecSettings) {
    let payload = encoded_officer(&settings);
    let output = run_args(
        &["inspect", payload.as_str(), "--iv", "0000000000000000"],
        &settings,
    )
    .expect("inspect never fails");
    assert!(output.contains("plaintext_error="));
}

#[test]
fn decode_error_is_wrapped() {
    let err = CliError::from(DecodeError::from(PayloadError::NotAnObject));
    assert_eq!(
        err.to_string(),
        "decode error: invalid payload format: payload JSON must be an object"
    );
}

#[rstest]
fn inspect_reports_lengths_from_a_single_framing_pass(settings: CodecSettings) {
    let payload = encoded_officer(&settings);
    let codec = FrontingPayloadCodec::with_default_clock(CipherParams::fronting())
        .with_backends(&[CtrBackend::Block]);
    let decrypted = codec.decrypt(&payload).expect("decrypts");

    let output = inspect(&codec, &payload);
    assert!(output.contains(&format!("ciphertext_bytes={}", decrypted.ciphertext_len())));
    assert!(output.contains("backend=block"));
    assert!(output.contains("json_keys="));
}

#[rstest]
fn inspect_reports_empty_payload_as_framing_error(settings: CodecSettings) {
    let output = run_args(&["inspect", "  "], &settings).expect("inspect never fails");
    assert!(output.contains("framing_error=encoded payload must not be empty"));
    assert!(!output.contains("ciphertext_bytes="));
}
