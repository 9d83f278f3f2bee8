pub mod check;
pub mod grid;
pub mod layout_ops;
pub mod task_ops;
