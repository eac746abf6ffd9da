//! Loading of tax tables and batch calculation inputs.

mod decimal_cell;
pub mod input_loader;
mod table_loader;

pub use input_loader::InputLoadError;
pub use table_loader::{TaxBracketRecord, TaxTableLoader, TaxTableLoaderError};
