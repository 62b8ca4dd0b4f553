//! UI module - contains UI rendering components
//!
//! `records` holds the egui-free projection of the record set,
//! `components` the painted widgets used by the records view.

pub mod components;
pub mod records;
