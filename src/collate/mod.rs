pub mod cli;
pub mod histogram;

pub mod consts {
    pub const COLLATE_CMD: &str = "collate";

    /// Seed row keyed by the poly-A repeat; present in every combined matrix
    /// so an empty chunk set still yields a schema-complete output.
    pub const ANCHOR_REPEAT_UNIT: &str = "A";
}

// Re-exports
pub use histogram::*;
