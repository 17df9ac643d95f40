pub mod invoice;
pub mod result;
pub mod window;

pub use invoice::{pick_amounts, subset_total, Amount, Total};
pub use result::{MatchResult, SubsetMatch, NO_MATCH_MESSAGE};
pub use window::{AcceptanceWindow, ToleranceMode};
