//! Identifier newtypes used for every cross-reference in the simulation.
//!
//! Entities never own each other. A hero remembers its target as an
//! [`EnemyId`]; a projectile remembers its source and target the same way.
//! Looking an identifier up may fail at any time, and callers treat a failed
//! lookup as "target no longer valid".

use serde::{Deserialize, Serialize};

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Creates a new identifier with the provided numeric value.
            #[must_use]
            pub const fn new(value: u32) -> Self {
                Self(value)
            }

            /// Retrieves the numeric representation of the identifier.
            #[must_use]
            pub const fn get(&self) -> u32 {
                self.0
            }
        }
    };
}

identifier!(
    /// Unique identifier assigned to a deployed hero.
    HeroId
);
identifier!(
    /// Unique identifier assigned to a turret.
    TurretId
);
identifier!(
    /// Unique identifier assigned to a spawned enemy.
    EnemyId
);
identifier!(
    /// Unique identifier assigned to a projectile in flight.
    ProjectileId
);
identifier!(
    /// Key of a hero definition within the content tables.
    HeroDefinitionId
);
identifier!(
    /// Key of a turret definition within the content tables.
    TurretDefinitionId
);
identifier!(
    /// Key of an enemy definition within the content tables.
    EnemyDefinitionId
);
identifier!(
    /// Key of a skill within a hero definition's catalog.
    SkillId
);

/// Monotonic identifier allocator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdCounter(u32);

impl IdCounter {
    /// Creates an allocator whose first identifier is `start`.
    #[must_use]
    pub const fn starting_at(start: u32) -> Self {
        Self(start)
    }

    /// Value the next allocation will return.
    #[must_use]
    pub const fn peek(&self) -> u32 {
        self.0
    }

    /// Returns the next raw identifier and advances the counter.
    pub fn allocate(&mut self) -> u32 {
        let value = self.0;
        self.0 = self.0.saturating_add(1);
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_is_monotonic() {
        let mut counter = IdCounter::starting_at(5);
        assert_eq!(counter.allocate(), 5);
        assert_eq!(counter.allocate(), 6);
        assert_eq!(counter.peek(), 7);
    }

    #[test]
    fn identifiers_order_by_value() {
        assert!(EnemyId::new(2) < EnemyId::new(10));
        assert_eq!(HeroId::new(3).get(), 3);
    }
}
