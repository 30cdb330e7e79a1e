//! `cibake` bootstraps continuous-integration build files.
//!
//! A requested command name is resolved to a [`core::pipeline::Command`], whose
//! tasks probe the locally installed tools and render configuration fragments
//! for the features those tools actually support.

include!(concat!(env!("OUT_DIR"), "/translations.rs"));

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod system;
