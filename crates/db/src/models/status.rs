//! Status helper enums mapping to SMALLSERIAL/SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding `*_statuses` database table.

use serde::Serialize;

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Look up a variant by its database status ID.
            pub fn from_id(id: StatusId) -> Option<Self> {
                match id {
                    $( $val => Some(Self::$variant), )+
                    _ => None,
                }
            }

            /// Lowercase name as seeded in the lookup table.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $label, )+
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

define_status_enum! {
    /// Async job lifecycle status.
    AsyncJobStatus {
        Pending = 1 => "pending",
        Running = 2 => "running",
        Done = 3 => "done",
        Error = 4 => "error",
    }
}

impl AsyncJobStatus {
    /// `Done` and `Error` end the lifecycle.
    pub fn is_terminal(self) -> bool {
        matches!(self, AsyncJobStatus::Done | AsyncJobStatus::Error)
    }

    /// Whether moving from `self` to `next` follows
    /// `Pending -> Running -> {Done | Error}`.
    ///
    /// `Pending -> Error` is also allowed so a job whose task dies before
    /// starting can still be closed out.
    pub fn can_transition_to(self, next: AsyncJobStatus) -> bool {
        use AsyncJobStatus::*;
        matches!(
            (self, next),
            (Pending, Running) | (Pending, Error) | (Running, Done) | (Running, Error)
        )
    }
}
