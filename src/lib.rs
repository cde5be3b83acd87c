//! Filter-and-aggregate engine behind the imports/exports dashboard.
//!
//! The GUI binary (`src/main.rs`) owns the window; everything it renders is
//! computed here from an immutable sampled [`data::model::Dataset`] and an
//! explicit [`data::filter::FilterSelection`].

pub mod config;
pub mod data;
pub mod layout;
