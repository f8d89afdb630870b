macro_rules! impl_from_into_u64 {
    ($main: ident) => {
        impl From<u64> for $main {
            fn from(n: u64) -> $main {
                $main(n)
            }
        }

        impl From<$main> for u64 {
            fn from(from: $main) -> u64 {
                from.0
            }
        }

        impl $main {
            pub const fn as_u64(&self) -> u64 {
                self.0
            }
        }
    };
}

macro_rules! impl_math_between {
    ($main: ident, $other: ident) => {
        impl Add<$other> for $main {
            type Output = $main;

            fn add(self, other: $other) -> $main {
                $main(self.0.saturating_add(u64::from(other)))
            }
        }

        impl AddAssign<$other> for $main {
            fn add_assign(&mut self, other: $other) {
                self.0 = self.0.saturating_add(u64::from(other));
            }
        }

        impl Sub<$other> for $main {
            type Output = $main;

            fn sub(self, other: $other) -> $main {
                $main(self.0.saturating_sub(u64::from(other)))
            }
        }

        impl PartialEq<$other> for $main {
            fn eq(&self, other: &$other) -> bool {
                let other: u64 = (*other).into();
                self.0 == other
            }
        }

        impl PartialOrd<$other> for $main {
            fn partial_cmp(&self, other: &$other) -> Option<Ordering> {
                let other: u64 = (*other).into();
                self.0.partial_cmp(&other)
            }
        }
    };
}

macro_rules! impl_display {
    ($type: ident) => {
        impl fmt::Display for $type {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

macro_rules! impl_common {
    ($type: ident) => {
        impl_from_into_u64!($type);
        impl_math_between!($type, $type);
        impl_math_between!($type, u64);
        impl_display!($type);

        impl Eq for $type {}

        impl Ord for $type {
            fn cmp(&self, other: &$type) -> Ordering {
                self.0.cmp(&other.0)
            }
        }

        impl Hash for $type {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.0.hash(state);
            }
        }

        impl $type {
            pub const fn new(n: u64) -> $type {
                $type(n)
            }

            pub const fn max_value() -> $type {
                $type(u64::MAX)
            }

            pub fn saturating_sub<T: Into<$type>>(&self, other: T) -> $type {
                $type(self.0.saturating_sub(other.into().0))
            }

            pub fn saturating_add<T: Into<$type>>(&self, other: T) -> $type {
                $type(self.0.saturating_add(other.into().0))
            }
        }
    };
}
