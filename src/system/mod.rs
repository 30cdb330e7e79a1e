//! # System Interaction Layer
//!
//! Boundary between the core logic and the operating system.
//!
//! ## Modules
//!
//! - **`executor`**: spawns short-lived external processes and captures their output.
//! - **`capabilities`**: answers whether a runtime extension is loaded, by asking the
//!   runtime itself.

pub mod capabilities;
pub mod executor;
