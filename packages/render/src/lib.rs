#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Legend and popup HTML fragments for field maps.
//!
//! Both builders are pure functions of their inputs and return `maud`
//! markup, so every interpolated value is HTML-escaped.

pub mod legend;
pub mod popup;

pub use maud::Markup;
