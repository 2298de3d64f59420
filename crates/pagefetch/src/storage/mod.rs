pub mod filesystem;

pub use filesystem::{build_placement, FileStorage, Placement};
