#[path = "1-path.rs"]
mod path;

#[path = "2-document.rs"]
mod document;

#[path = "3-batch.rs"]
mod batch;

pub use batch::*;
pub use document::*;
pub use path::*;
