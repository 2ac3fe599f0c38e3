//! Playing games: the table loop, multi-game sessions and their observers

pub mod observers;
pub mod session;
pub mod table;

pub use observers::{LogObserver, MetricsObserver, MetricsSummary, ProgressObserver};
pub use session::{Session, SessionSummary};
pub use table::{MAX_PLAYERS, Table};

pub use crate::ports::{Agent, Observer};
