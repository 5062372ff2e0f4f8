//! Typed integer handles.
//!
//! Every handle is a `Copy + Ord + Hash` newtype over an unsigned integer,
//! so handles sort, hash and index without conversions at call sites.  The
//! largest value of the inner type is reserved as `INVALID`: it marks empty
//! result slots and unset fields, and no registry ever hands it out.

use std::fmt;

/// Define a handle newtype over an unsigned integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Reserved "no handle" value.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// The handle as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Handle for position `i` of a registry, or `None` if `i` does
            /// not fit below the reserved value.
            #[inline]
            pub fn from_index(i: usize) -> Option<Self> {
                <$inner>::try_from(i)
                    .ok()
                    .filter(|&raw| raw != <$inner>::MAX)
                    .map($name)
            }

            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", stringify!($name), self.0)
                } else {
                    write!(f, "{}(invalid)", stringify!($name))
                }
            }
        }
    };
}

typed_id! {
    /// Handle of a registered agent.  Handles are never reused.
    pub struct AgentId(u32);
}

typed_id! {
    /// Row-major tile index: `y * width + x`.
    ///
    /// `TileIndex::INVALID` (`u32::MAX`) is the empty-slot sentinel in packed
    /// result tables.  It can never collide with a real tile because
    /// [`GridDims`](crate::GridDims) rejects grids with `u32::MAX` or more tiles.
    pub struct TileIndex(u32);
}

typed_id! {
    /// Index of a view profile in the profile registry.
    pub struct ProfileId(u16);
}

typed_id! {
    /// Index of a cell of the coarse spatial partition.
    pub struct ZoneId(u32);
}
