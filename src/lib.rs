//! A Kanban board stored as one page document: a flat task list plus a
//! boundary table mapping (group × status) cells to slices of it.
//!
//! [`ops::grid`] keeps the two in step under move, provisional insert,
//! reconcile and remove; the rest of the crate loads, validates, edits and
//! saves boards around it.

pub mod cli;
pub mod io;
pub mod model;
pub mod ops;
pub mod util;
