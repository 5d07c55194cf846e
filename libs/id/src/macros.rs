//! Declarative macros behind every ID type.
//!
//! Both kinds of ID travel as plain strings, so they share one
//! `Display`/`FromStr`/serde surface through `impl_id_string!`.

#[doc(hidden)]
#[macro_export]
macro_rules! impl_id_string {
    ($name:ident) => {
        impl std::str::FromStr for $name {
            type Err = $crate::IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Self::parse(&raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

/// Defines an ID the scheduler mints itself, rendered as `{prefix}_{ulid}`.
///
/// ```ignore
/// define_id!(
///     /// A rollout plan.
///     PlanId, "pln"
/// );
/// let id: PlanId = "pln_01HV4Z2WQXKJNM8GPQY6VBKC3D".parse()?;
/// ```
#[macro_export]
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name($crate::Ulid);

        impl $name {
            pub const PREFIX: &'static str = $prefix;

            /// Mints a fresh ID. IDs minted later sort after earlier ones.
            #[must_use]
            pub fn new() -> Self {
                Self($crate::Ulid::new())
            }

            #[must_use]
            pub const fn from_ulid(ulid: $crate::Ulid) -> Self {
                Self(ulid)
            }

            #[must_use]
            pub const fn ulid(&self) -> $crate::Ulid {
                self.0
            }

            pub fn parse(s: &str) -> Result<Self, $crate::IdError> {
                const KIND: &str = stringify!($name);
                if s.is_empty() {
                    return Err($crate::IdError::Empty { kind: KIND });
                }
                let encoded = s.strip_prefix(concat!($prefix, "_")).ok_or_else(|| {
                    $crate::IdError::WrongPrefix {
                        kind: KIND,
                        prefix: $prefix,
                        input: s.to_string(),
                    }
                })?;
                $crate::Ulid::from_string(encoded)
                    .map(Self)
                    .map_err(|_| $crate::IdError::MalformedUlid {
                        kind: KIND,
                        input: s.to_string(),
                    })
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(concat!($prefix, "_"))?;
                std::fmt::Display::fmt(&self.0, f)
            }
        }

        $crate::impl_id_string!($name);
    };
}

/// Defines an ID assigned by the cluster and never interpreted here.
///
/// `new` wraps a value the cluster handed over as-is; `parse` is for
/// untrusted input such as configuration or operator commands.
#[macro_export]
macro_rules! define_opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn parse(s: &str) -> Result<Self, $crate::IdError> {
                const KIND: &str = stringify!($name);
                if s.is_empty() {
                    return Err($crate::IdError::Empty { kind: KIND });
                }
                if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
                    return Err($crate::IdError::IllegalCharacter {
                        kind: KIND,
                        input: s.to_string(),
                    });
                }
                Ok(Self(s.to_string()))
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        $crate::impl_id_string!($name);
    };
}
