pub mod document;
pub mod highlight;
pub mod io;
pub mod models;
pub mod persistence;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use document::outline::*;
pub use highlight::{
    algebra::*, ids::*, overlay::*, patch::*, position::*, range::*, reconcile::*, session::*,
    store::*,
};
pub use io::*;
pub use models::patent_file::*;
pub use persistence::*;
