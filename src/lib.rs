//! Categorise L1 trigger seeds by name, sum their rates per category, and
//! chart the result.
//!
//! The pipeline is strictly linear:
//! [`data`] (load) → [`category`] (classify) → [`analysis`] (aggregate and
//! check) → [`report`] (pie and bar charts). [`run::run`] strings it together.

pub mod analysis;
pub mod category;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod report;
pub mod run;
