pub mod cli;
pub mod logging;
pub mod report;
pub mod utils;
