//! Application core: the two tasks and the state they share.
//!
//! ```text
//!  Transport ──▶ Receiver ──▶ CommandQueue ──▶ Controller ──▶ ActuatorPort
//!      ▲             │                             │
//!      └──── report ─┴──────── ControllerContext ──┘
//! ```
//!
//! Everything the tasks share lives in one [`ControllerContext`] built at
//! startup and handed to both tasks.  Hardware is reached only through
//! [`Transport`](crate::link::transport::Transport) and [`ActuatorPort`],
//! so the whole core runs against mocks on the host.
//!
//! [`ControllerContext`]: context::ControllerContext
//! [`ActuatorPort`]: ports::ActuatorPort

pub mod context;
pub mod controller;
pub mod ports;
pub mod receiver;
pub mod reporter;
pub mod state;
