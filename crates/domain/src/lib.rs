//! # lumen-domain
//!
//! Pure domain model for the lumen ambient-lighting controller.
//!
//! ## Responsibilities
//! - Foundational types: colours, effect identifiers, device addresses, error conventions
//! - Define **`LightEntry`** (the target lighting state produced once per tick)
//! - Define the precedence rules between a source decision and an automation override
//! - Project a `LightEntry` into the ordered **Directives** a device understands
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod color;
pub mod device;
pub mod directive;
pub mod effect;
pub mod light;
