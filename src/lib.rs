//! Brawlball - multiplayer 3D soccer brawler
//!
//! The library half of the package: the relay server state machine, the wire
//! protocol, and the headless client core (local physics prediction, remote
//! mirrors, input mapping). The binary in `main.rs` wires the server side to
//! an HTTP/WebSocket listener; rendering and audio live in the browser client
//! and are out of scope here.

pub mod app;
pub mod client;
pub mod config;
pub mod game;
pub mod http;
pub mod util;
pub mod ws;
