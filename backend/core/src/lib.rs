pub mod clock;
pub mod error;
pub mod message;
pub mod record;
pub mod window;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ActivityError, Result};
pub use message::{InboundMessage, USER_ID_EXTRA};
pub use record::ActivityRecord;
pub use window::{max_window, parse_window, QueryWindow, DEFAULT_QUERY_LIMIT, DEFAULT_WINDOW_SECS};
