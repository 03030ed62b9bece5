//! Accept loop. Every connection gets its own task.

pub mod listener;
