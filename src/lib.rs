//! Match-three board core.
//!
//! [`board::Grid`] owns the pieces and runs matching, gravity refill, clears and
//! player swaps. [`layout`] parses text boards and [`level`] turns board events
//! into score and a win/lose outcome.

pub mod board;
pub mod layout;
pub mod level;
