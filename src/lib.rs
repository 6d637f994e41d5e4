#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod api;
pub mod bootstrap;
pub mod card;
pub mod client;
pub mod config;
pub mod error;
pub mod player;
pub mod poller;
pub mod snapshot;
pub mod test_util;
pub mod view;
