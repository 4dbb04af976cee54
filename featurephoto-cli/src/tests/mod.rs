//! Shared test harness modules for the feature photo CLI.

use super::*;

mod helpers;
mod unit;
