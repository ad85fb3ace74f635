pub mod clock;
pub mod relay;

pub use clock::{Clock, ManualClock, SystemClock};
pub use relay::{NotificationRelay, Slot};
