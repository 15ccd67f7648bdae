pub mod envelope;
pub mod error;
pub mod todo;

pub use envelope::*;
pub use error::*;
pub use todo::*;
