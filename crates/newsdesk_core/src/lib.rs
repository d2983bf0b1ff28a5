pub mod dashboard;
pub mod error;
pub mod export;
pub mod filter;
pub mod labels;
pub mod rank;
pub mod ticker;
pub mod types;

pub use dashboard::{Dashboard, LoadTicket, LOAD_ERROR_MESSAGE};
pub use error::{Error, Result};
pub use export::{export_csv, export_file_name};
pub use filter::{dedupe, select, FilterOptions, FilterSet};
pub use rank::rank;
pub use ticker::{breaking, Ticker, TickerRotation};
pub use types::Article;
