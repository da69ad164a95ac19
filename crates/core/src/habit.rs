//! Habit entity, its enums, and the inbound/validated payload shapes.
//!
//! Inbound payloads ([`CreateHabit`], [`UpdateHabit`]) keep enum-like fields
//! as raw strings so that unrecognized values reach the rule validator and
//! fail with a specific rule code. The validator turns them into the typed
//! [`NewHabit`] / [`HabitPatch`] forms.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Number;

use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Wire enums
// ---------------------------------------------------------------------------

/// Error returned when a wire string does not name any variant of an enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Defines a unit enum with a canonical wire string per variant plus any
/// number of accepted input aliases.
macro_rules! define_wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $wire:literal $(| $alias:literal)* ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire $(, alias = $alias)*)]
                $variant
            ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Canonical wire string.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $wire ),+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $wire $(| $alias)* => Ok($name::$variant), )+
                    _ => Err(UnknownVariant {
                        kind: stringify!($name),
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

define_wire_enum! {
    /// How often a habit recurs. Determines which day list is active.
    FrequencyType {
        Daily = "diaria" | "diária",
        Weekly = "semanal",
        Monthly = "mensal",
    }
}

define_wire_enum! {
    /// Day of the week, Monday first.
    WeekDay {
        Monday = "segunda",
        Tuesday = "terca" | "terça",
        Wednesday = "quarta",
        Thursday = "quinta",
        Friday = "sexta",
        Saturday = "sabado" | "sábado",
        Sunday = "domingo",
    }
}

define_wire_enum! {
    /// Habit lifecycle status. Transitions are unconstrained; a soft delete
    /// is a transition to `Inactive`.
    HabitStatus {
        Active = "ativo",
        Inactive = "inativo",
        Completed = "concluido" | "concluído",
    }
}

impl FrequencyType {
    /// Whether this frequency is scheduled by days of the week.
    pub fn uses_week_days(self) -> bool {
        matches!(self, FrequencyType::Daily | FrequencyType::Weekly)
    }
}

// ---------------------------------------------------------------------------
// Inbound payloads
// ---------------------------------------------------------------------------

/// Raw create payload as received from a client.
///
/// `name`, `frequencyType` and `startDate` default to an empty string when
/// missing so that the validator reports the proper rule code. Numeric
/// fields are kept as JSON numbers for the same reason: `1.5` minutes is a
/// duration violation, not a malformed body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHabit {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub frequency_type: String,
    pub week_days: Option<Vec<String>>,
    pub month_days: Option<Vec<Number>>,
    pub scheduled_time: Option<String>,
    pub estimated_minutes: Option<Number>,
    #[serde(default)]
    pub start_date: String,
    pub category_id: Option<DbId>,
}

/// Raw update payload. Every field is optional.
///
/// Nullable fields are tri-state: `None` means the key was absent (leave the
/// stored value alone), `Some(None)` means an explicit `null` (clear it).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHabit {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    pub frequency_type: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub week_days: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "present")]
    pub month_days: Option<Option<Vec<Number>>>,
    #[serde(default, deserialize_with = "present")]
    pub scheduled_time: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub estimated_minutes: Option<Option<Number>>,
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub category_id: Option<Option<DbId>>,
    pub status: Option<String>,
}

/// Marks a key as present, keeping an explicit `null` as `Some(None)`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

// ---------------------------------------------------------------------------
// Validated forms
// ---------------------------------------------------------------------------

/// A create payload that passed every rule, with free text trimmed and the
/// day list irrelevant to the frequency cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHabit {
    pub name: String,
    pub description: Option<String>,
    pub frequency_type: FrequencyType,
    pub week_days: Option<Vec<WeekDay>>,
    pub month_days: Option<Vec<u8>>,
    pub scheduled_time: Option<String>,
    pub estimated_minutes: Option<i32>,
    pub start_date: NaiveDate,
    pub category_id: Option<DbId>,
}

/// A validated update. Outer `None` leaves the stored field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub frequency_type: Option<FrequencyType>,
    pub week_days: Option<Option<Vec<WeekDay>>>,
    pub month_days: Option<Option<Vec<u8>>>,
    pub scheduled_time: Option<Option<String>>,
    pub estimated_minutes: Option<Option<i32>>,
    pub start_date: Option<NaiveDate>,
    pub category_id: Option<Option<DbId>>,
    pub status: Option<HabitStatus>,
}

impl HabitPatch {
    /// Patch that soft-deletes a habit.
    pub fn deactivate() -> Self {
        Self {
            status: Some(HabitStatus::Inactive),
            ..Self::default()
        }
    }
}

impl From<&NewHabit> for CreateHabit {
    fn from(habit: &NewHabit) -> Self {
        Self {
            name: habit.name.clone(),
            description: habit.description.clone(),
            frequency_type: habit.frequency_type.as_str().to_string(),
            week_days: habit
                .week_days
                .as_ref()
                .map(|days| days.iter().map(|d| d.as_str().to_string()).collect()),
            month_days: habit
                .month_days
                .as_ref()
                .map(|days| days.iter().map(|&d| Number::from(d)).collect()),
            scheduled_time: habit.scheduled_time.clone(),
            estimated_minutes: habit.estimated_minutes.map(Number::from),
            start_date: habit.start_date.to_string(),
            category_id: habit.category_id,
        }
    }
}

// ---------------------------------------------------------------------------
// Persisted entity
// ---------------------------------------------------------------------------

/// A stored habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitRecord {
    pub id: DbId,
    pub owner_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub frequency_type: FrequencyType,
    pub week_days: Option<Vec<WeekDay>>,
    pub month_days: Option<Vec<u8>>,
    pub scheduled_time: Option<String>,
    pub estimated_minutes: Option<i32>,
    pub start_date: NaiveDate,
    pub category_id: Option<DbId>,
    pub status: HabitStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl HabitRecord {
    /// Build a fresh record from a validated create payload. New habits
    /// always start `Active`.
    pub fn from_new(id: DbId, owner_id: DbId, habit: NewHabit, created_at: Timestamp) -> Self {
        Self {
            id,
            owner_id,
            name: habit.name,
            description: habit.description,
            frequency_type: habit.frequency_type,
            week_days: habit.week_days,
            month_days: habit.month_days,
            scheduled_time: habit.scheduled_time,
            estimated_minutes: habit.estimated_minutes,
            start_date: habit.start_date,
            category_id: habit.category_id,
            status: HabitStatus::Active,
            created_at,
            updated_at: created_at,
        }
    }
}
