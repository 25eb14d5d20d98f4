// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::ports::{HrError, StoreError};

/// Errors raised while generating cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// The card store failed.
    Store(StoreError),
    /// The HR system failed.
    Hr(HrError),
    /// A resolved card references a bonus type the store does not know.
    MissingBonusType(String),
    /// A card-creation intent was raised for an empty run of records.
    EmptyRun,
}

impl std::fmt::Display for GenerationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(e) => write!(f, "{e}"),
            Self::Hr(e) => write!(f, "{e}"),
            Self::MissingBonusType(key) => write!(f, "Unknown bonus type key: {key}"),
            Self::EmptyRun => write!(f, "Cannot create a card from an empty record run"),
        }
    }
}

impl std::error::Error for GenerationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            Self::Hr(e) => Some(e),
            Self::MissingBonusType(_) | Self::EmptyRun => None,
        }
    }
}

impl From<StoreError> for GenerationError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<HrError> for GenerationError {
    fn from(e: HrError) -> Self {
        Self::Hr(e)
    }
}
