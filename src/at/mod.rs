//! The shared AT protocol engine.
//!
//! Split the same way the hardware splits it: [`line`] runs on the UART
//! receive interrupt and only accumulates bytes into lines, everything else
//! runs on the application thread. A [`heapless::spsc`] queue carries
//! completed lines across. One command is in flight per [`AtClient`] at a
//! time; unsolicited event lines arriving in between are matched against a
//! static nested table and handed to an [`EventSink`].

pub mod client;
pub mod codec;
pub mod command;
pub mod event;
pub mod line;

pub use client::{AtClient, ConfirmDialect, ConfirmStatus, EventSink, TimeoutCategory, TimeoutTable};
pub use codec::{ArgParser, IntFormat};
pub use command::CmdBuilder;
pub use event::{match_event, EventEntry, EventKind};
pub use line::{LineIngress, LineQueue};
