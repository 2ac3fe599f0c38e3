//! CLI command implementations

pub mod matchup;
pub mod play;
pub mod train;

use crate::pipeline::{LogObserver, ProgressObserver, Session};

/// Attach the observers every command shares
pub(crate) fn attach_observers(session: &mut Session<'_>, progress: bool) {
    session.add_observer(Box::new(LogObserver::new()));
    if progress {
        session.add_observer(Box::new(ProgressObserver::new()));
    }
}
