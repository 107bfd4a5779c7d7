use serde::Serialize;
use std::fmt::Debug;
use std::fmt::Display;

/// Index of the city in the city matrix.
/// `u16` is enough since it is extremely unlikely that number of cities would be greater.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CityIndex(u16);

impl CityIndex {
    pub const MAX_CITIES: usize = u16::MAX as usize;

    pub fn new(index: usize) -> CityIndex {
        debug_assert!(index < Self::MAX_CITIES, "index: {index}");
        CityIndex(index as u16)
    }

    pub fn get(self) -> usize {
        self.0.into()
    }
}

impl From<CityIndex> for u16 {
    fn from(value: CityIndex) -> Self {
        value.0
    }
}

impl From<CityIndex> for usize {
    fn from(value: CityIndex) -> Self {
        value.0.into()
    }
}

impl From<&CityIndex> for usize {
    fn from(value: &CityIndex) -> Self {
        value.0.into()
    }
}

impl Debug for CityIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "c{}", self.0)
    }
}

impl Display for CityIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
