mod lookup;
pub mod server;
pub mod tracing;

pub use lookup::StaticLookup;
pub use server::{TestIngest, send_to};
pub use tracing::{CapturedEvent, events, init_test_tracing};
