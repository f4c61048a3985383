//! 库所与迁移的稠密索引类型，按 id 字典序分配于 `[0, n)`.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::net::index_vec::Idx;

macro_rules! define_index {
    ($name:ident, $prefix:literal) => {
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            pub const fn raw(self) -> u32 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl Idx for $name {
            fn index(self) -> usize {
                self.0 as usize
            }

            fn from_usize(idx: usize) -> Self {
                debug_assert!(idx <= u32::MAX as usize);
                Self(idx as u32)
            }
        }
    };
}

define_index!(PlaceId, "P");
define_index!(TransitionId, "T");
