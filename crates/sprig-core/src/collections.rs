//! Hash collections used for host-side bookkeeping. The `std-hash` feature
//! swaps `hashbrown` for the standard library collections.

#[cfg(feature = "std-hash")]
pub(crate) use std::collections::{HashMap, HashSet};

#[cfg(not(feature = "std-hash"))]
pub(crate) use hashbrown::{HashMap, HashSet};
