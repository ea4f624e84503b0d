//! Parser test suite

mod containers;
mod support;
