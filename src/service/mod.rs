mod actor;
mod handle;

pub use actor::{RosterActor, RosterActorHandle, RosterCommand};
pub use handle::RosterHandle;
