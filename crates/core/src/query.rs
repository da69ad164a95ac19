//! Habit list filtering and ordering -- pure logic over a snapshot.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::habit::{HabitRecord, HabitStatus, UnknownVariant};
use crate::types::DbId;

/// Which statuses a listing includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(HabitStatus),
}

/// Sort order for habit listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HabitOrder {
    NameAsc,
    NameDesc,
    StartDateAsc,
    StartDateDesc,
    CreatedAtAsc,
    #[default]
    CreatedAtDesc,
}

impl HabitOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            HabitOrder::NameAsc => "nome_asc",
            HabitOrder::NameDesc => "nome_desc",
            HabitOrder::StartDateAsc => "data_inicio_asc",
            HabitOrder::StartDateDesc => "data_inicio_desc",
            HabitOrder::CreatedAtAsc => "data_cadastro_asc",
            HabitOrder::CreatedAtDesc => "data_cadastro_desc",
        }
    }

    fn compare(self, a: &HabitRecord, b: &HabitRecord) -> Ordering {
        match self {
            HabitOrder::NameAsc => compare_names(&a.name, &b.name),
            HabitOrder::NameDesc => compare_names(&b.name, &a.name),
            HabitOrder::StartDateAsc => a.start_date.cmp(&b.start_date),
            HabitOrder::StartDateDesc => b.start_date.cmp(&a.start_date),
            HabitOrder::CreatedAtAsc => a.created_at.cmp(&b.created_at),
            HabitOrder::CreatedAtDesc => b.created_at.cmp(&a.created_at),
        }
    }
}

impl FromStr for HabitOrder {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nome_asc" => Ok(HabitOrder::NameAsc),
            "nome_desc" => Ok(HabitOrder::NameDesc),
            "data_inicio_asc" => Ok(HabitOrder::StartDateAsc),
            "data_inicio_desc" => Ok(HabitOrder::StartDateDesc),
            "data_cadastro_asc" => Ok(HabitOrder::CreatedAtAsc),
            "data_cadastro_desc" => Ok(HabitOrder::CreatedAtDesc),
            _ => Err(UnknownVariant {
                kind: "HabitOrder",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for HabitOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter and sort parameters for one listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitListQuery {
    pub status: StatusFilter,
    /// `None`: any category. `Some(None)`: only habits without a category.
    pub category: Option<Option<DbId>>,
    /// Defaults to [`HabitOrder::CreatedAtDesc`].
    pub order: Option<HabitOrder>,
}

/// Return the owner's habits matching `query`, in the requested order.
///
/// The input is never modified. The sort is stable, so ties keep the
/// relative order they have in `records`.
pub fn list(records: &[HabitRecord], owner_id: DbId, query: &HabitListQuery) -> Vec<HabitRecord> {
    let mut visible: Vec<HabitRecord> = records
        .iter()
        .filter(|r| r.owner_id == owner_id)
        .filter(|r| match query.status {
            StatusFilter::All => true,
            StatusFilter::Only(status) => r.status == status,
        })
        .filter(|r| match query.category {
            None => true,
            Some(category) => r.category_id == category,
        })
        .cloned()
        .collect();

    let order = query.order.unwrap_or_default();
    visible.sort_by(|a, b| order.compare(a, b));
    visible
}

/// Case- and accent-insensitive comparison, falling back to the raw strings
/// so distinct names never compare equal.
fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

fn collation_key(name: &str) -> String {
    name.chars()
        .flat_map(char::to_lowercase)
        .map(fold_diacritic)
        .collect()
}

/// Map accented Latin letters to their base letter.
fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}
