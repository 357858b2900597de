//! UI components.

pub mod snowfall;
