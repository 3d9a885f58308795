#[macro_use]
extern crate quick_error;

pub mod argparse;
pub mod resources;
