//! Serial command link.
//!
//! ```text
//! ┌───────────┐  byte   ┌──────────┐  code   ┌──────────────┐
//! │ Transport │────────▶│ Protocol │────────▶│ CommandQueue │──▶ controller
//! │  (trait)  │◀────────│ (render) │◀─ report ──────────────────── both tasks
//! └───────────┘ STATE:n └──────────┘
//! ```
//!
//! [`client`] holds the peer-side helpers (report decoding, toggle requests)
//! used by host tools talking to the device.

pub mod client;
pub mod protocol;
pub mod queue;
pub mod transport;
