// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

mod catalog;
mod language;
mod provider;
mod selection;
mod translation;

pub use catalog::*;
pub use language::*;
pub use provider::*;
pub use selection::*;
pub use translation::*;
