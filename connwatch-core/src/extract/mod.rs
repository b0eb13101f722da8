mod error;
mod extractor;


pub use error::ExtractError;
pub use extractor::{DEFAULT_PROTOCOLS, Extractor};
