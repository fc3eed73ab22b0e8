//! Side-effecting operations: descriptor files, directory scaffolding,
//! process execution.

pub mod descriptor;
pub mod project;
pub mod run;
pub mod scaffold;
