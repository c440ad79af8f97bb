//! The quoting engine: competitor analysis, per-side order lifecycle, the
//! poll loops, and the supervisor that owns them.

pub mod analyzer;
pub mod quoter;
pub mod side;
pub mod status;
pub mod supervisor;

pub use analyzer::desired_quote_price;
pub use quoter::QuoteLoop;
pub use side::{needs_reposition, RetryPolicy, SideQuoter};
pub use status::{EngineStatus, OrderView, SideStatus, StatusBoard};
pub use supervisor::{Engine, EngineError};
