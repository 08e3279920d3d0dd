//! Fuzz target: `ReportDecoder::feed` and the inbound byte classifier.
//!
//! Drives arbitrary byte sequences through the peer-side report decoder
//! and asserts that it never panics, only yields states for well-formed
//! lines, and decodes cleanly again after a reset.  Every byte is also
//! run through `classify`, which must map the four protocol bytes and
//! nothing else.
//!
//! cargo fuzz run fuzz_report_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use relayctl::app::state::DeviceState;
use relayctl::link::client::ReportDecoder;
use relayctl::link::protocol::{Inbound, classify};

fuzz_target!(|data: &[u8]| {
    let mut decoder = ReportDecoder::new();
    let newlines = data.iter().filter(|&&b| b == b'\n').count();
    let mut yielded = 0usize;
    decoder.feed(data, |_| yielded += 1);
    assert!(yielded <= newlines, "decoder yielded more states than lines");

    // After a reset the decoder must accept a clean report again.
    decoder.reset();
    let mut seen = None;
    decoder.feed(b"\nSTATE:0\n", |s| seen = Some(s));
    assert_eq!(seen, Some(DeviceState::Off));

    for &byte in data {
        match classify(byte) {
            Inbound::Command(cmd) => assert_eq!(cmd.wire_byte(), byte),
            Inbound::Query => assert!(byte == b'S' || byte == b's'),
            Inbound::Noise(b) => {
                assert_eq!(b, byte);
                assert!(!matches!(b, b'0' | b'1' | b'S' | b's'));
            }
        }
    }
});
