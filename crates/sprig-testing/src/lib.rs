//! Testing utilities and harness for Sprig

pub mod testing;

// Re-export testing utilities
pub use testing::*;

pub mod prelude {
    pub use crate::testing::*;
}
