//! Rendering: navigation panels, page bodies, tables and plot primitives.

pub mod pages;
pub mod panels;
pub mod plot;
pub mod table;
