//! Common types used across the workspace.

pub mod id;
pub mod matching;
pub mod money;
pub mod period;

pub use id::{MovementId, UnitId, UserId};
pub use matching::{MatchStrategy, normalize_description};
pub use money::{Money, MoneyParseError};
pub use period::{Period, PeriodError};
