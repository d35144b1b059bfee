//! Error types

mod export;
mod source;
mod store;
mod validation;
mod view;

pub use export::*;
pub use source::*;
pub use store::*;
pub use validation::*;
pub use view::*;
