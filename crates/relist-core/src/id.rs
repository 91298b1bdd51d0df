//! Typed identities.
//!
//! Every live row and every history row carries its own UUID. The newtypes
//! keep a list id from being passed where a revision id is expected.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(
      Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
      Deserialize,
    )]
    #[serde(transparent)]
    pub struct $name(Uuid);

    impl $name {
      /// A fresh random identity.
      pub fn new() -> Self { Self(Uuid::new_v4()) }

      pub fn as_uuid(&self) -> Uuid { self.0 }
    }

    impl Default for $name {
      fn default() -> Self { Self::new() }
    }

    impl From<Uuid> for $name {
      fn from(id: Uuid) -> Self { Self(id) }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
      }
    }

    impl FromStr for $name {
      type Err = uuid::Error;

      fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
      }
    }
  };
}

uuid_id! {
  /// Identity of a todo list; stable across revisions and restores.
  ListId
}

uuid_id! {
  /// Identity of a single todo item; stable across revisions and restores.
  TodoId
}

uuid_id! {
  /// Identity of one archived version of a todo list.
  ListRevisionId
}

uuid_id! {
  /// Identity of one archived version of a todo item.
  TodoRevisionId
}
