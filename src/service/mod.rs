pub mod matcher;
pub mod meet_in_middle;
pub mod session;

pub use matcher::{find_closest_in_window, find_closest_subset, MatchError, Strategy, SubsetMatcher};
pub use meet_in_middle::find_closest_subset_mitm;
pub use session::{Session, SessionError};
