mod environment;
mod error;

pub use environment::{Environment, IssuerConfig};
pub use error::{AppError, RequestError};
