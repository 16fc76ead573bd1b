//! Behavioural tests for fronting payload decoding.
//!
//! These scenarios cover the portal's view of the codec: decoding the
//! payload from its URL, classifying failures, and reusing a stored officer
//! session within its validity window.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]


use std::sync::Arc;

use chrono::TimeDelta;
use fronting_codec::session::{MemorySessionStore, OfficerSessionCache};
use fronting_codec::url_param::{DEFAULT_QUERY_PARAM, payload_from_url};
use fronting_codec::{CipherParams, DecodeError, FrontingPayloadCodec, OfficerRecord};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use test_support::{KNOWN_PAYLOAD, MutableClock};

type Cache = OfficerSessionCache<MemorySessionStore>;

#[derive(Default, ScenarioState)]
struct World {
    clock: Slot<Arc<MutableClock>>,
    codec: Slot<FrontingPayloadCodec>,
    cache: Slot<Arc<Cache>>,
    result: Slot<Result<OfficerRecord, DecodeError>>,
    session: Slot<Option<OfficerRecord>>,
}

impl World {
    fn codec(&self) -> FrontingPayloadCodec {
        self.codec.get().expect("codec should be set")
    }

    fn decode(&self, encoded: &str) {
        let result = self.codec().decode(encoded);
        self.result.set(result);
    }

    fn decoded(&self) -> OfficerRecord {
        self.result
            .get()
            .expect("decode result should be set")
            .expect("decode should succeed")
    }
}

#[fixture]
fn world() -> World {
    World::default()
}

#[given("the production fronting codec")]
fn the_production_fronting_codec(world: &World) {
    let clock = Arc::new(MutableClock::starting_at_fixture());
    let codec = FrontingPayloadCodec::new(CipherParams::fronting(), clock.clone());
    world.clock.set(clock);
    world.codec.set(codec);
}

#[given("an officer session established from the known payload")]
fn an_officer_session_established_from_the_known_payload(world: &World) {
    let clock = world.clock.get().expect("clock should be set");
    let cache = Cache::new(MemorySessionStore::default(), clock);
    cache
        .establish(&world.codec(), Some(KNOWN_PAYLOAD))
        .expect("known payload decodes");
    world.cache.set(Arc::new(cache));
}

#[when("the known payload is decoded")]
fn the_known_payload_is_decoded(world: &World) {
    world.decode(KNOWN_PAYLOAD);
}

#[when("the known payload is read from the portal URL and decoded")]
fn the_known_payload_is_read_from_the_portal_url_and_decoded(world: &World) {
    let url = format!("https://portal.example/fronting?{DEFAULT_QUERY_PARAM}={KNOWN_PAYLOAD}");
    let payload = payload_from_url(&url, DEFAULT_QUERY_PARAM)
        .expect("valid URL")
        .expect("payload present");
    world.decode(&payload);
}

#[when("the payload \"{payload}\" is decoded")]
fn the_payload_is_decoded(world: &World, payload: String) {
    world.decode(&payload);
}

#[when("an encrypted non-JSON plaintext is decoded")]
fn an_encrypted_non_json_plaintext_is_decoded(world: &World) {
    let payload = world
        .codec()
        .encode_plaintext("hello, not json")
        .expect("plaintext encodes");
    world.decode(&payload);
}

#[when("an empty payload is decoded")]
fn an_empty_payload_is_decoded(world: &World) {
    world.decode("");
}

#[when("the portal is reopened without a payload after {hours:i64} hours")]
fn the_portal_is_reopened_without_a_payload(world: &World, hours: i64) {
    world
        .clock
        .get()
        .expect("clock should be set")
        .advance(TimeDelta::hours(hours));
    let cache = world.cache.get().expect("session cache should be set");
    let session = cache
        .establish(&world.codec(), None)
        .expect("no payload means no decode error");
    world.session.set(session);
}

#[then("the officer identifier is \"{identifier}\"")]
fn the_officer_identifier_is(world: &World, identifier: String) {
    assert_eq!(world.decoded().identifier, identifier);
}

#[then("the officer name is \"{name}\"")]
fn the_officer_name_is(world: &World, name: String) {
    assert_eq!(world.decoded().name, name);
}

#[then("decoding fails with \"{kind}\"")]
fn decoding_fails_with(world: &World, kind: String) {
    let result = world.result.get().expect("decode result should be set");
    let err = result.expect_err("decode should fail");
    assert_eq!(err.kind(), kind, "unexpected error: {err}");
}

#[then("the session officer identifier is \"{identifier}\"")]
fn the_session_officer_identifier_is(world: &World, identifier: String) {
    let session = world
        .session
        .get()
        .expect("session lookup should be recorded")
        .expect("session should still be valid");
    assert_eq!(session.identifier, identifier);
}

#[then("no officer session is available")]
fn no_officer_session_is_available(world: &World) {
    let session = world.session.get().expect("session lookup should be recorded");
    assert!(session.is_none());
}

#[scenario(path = "tests/features/fronting_decode.feature", index = 0)]
fn known_payload_decodes(world: World) {
    drop(world);
}

#[scenario(path = "tests/features/fronting_decode.feature", index = 1)]
fn payload_from_url_decodes(world: World) {
    drop(world);
}

#[scenario(path = "tests/features/fronting_decode.feature", index = 2)]
fn non_base64_payload_is_rejected(world: World) {
    drop(world);
}

#[scenario(path = "tests/features/fronting_decode.feature", index = 3)]
fn non_json_plaintext_is_rejected(world: World) {
    drop(world);
}

#[scenario(path = "tests/features/fronting_decode.feature", index = 4)]
fn empty_payload_is_rejected(world: World) {
    drop(world);
}

#[scenario(path = "tests/features/fronting_decode.feature", index = 5)]
fn session_is_reused_within_window(world: World) {
    drop(world);
}

#[scenario(path = "tests/features/fronting_decode.feature", index = 6)]
fn session_expires_after_window(world: World) {
    drop(world);
}
