//! Dataset assemblers: clusters in, shuffled CSV rows out.

pub mod orders;
pub mod population;
pub mod returns;

pub use orders::{OrderLineRow, assemble_orders};
pub use population::{AccountRow, PopulationRows, TransactionRow, assemble_population};
pub use returns::{ReturnRequest, ReturnRow, assemble_returns};
