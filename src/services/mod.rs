pub mod forum;
pub mod roster;
pub mod showcase;

pub use forum::{ForumService, Reconciliation};
pub use roster::{ClassWork, RosterService};
pub use showcase::ShowcaseService;
