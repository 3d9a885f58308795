#[macro_use]
extern crate quick_error;

pub mod settings;
pub mod walk;
