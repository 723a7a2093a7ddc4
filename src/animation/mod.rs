//! From a table to a looping GIF.
//!
//! ```text
//!   Table ──sequencer──▶ <output>/<value>.png ... ──assembler──▶ <output>.gif
//!                                                  (natural order)
//! ```

pub mod assembler;
pub mod natural;
pub mod sequencer;
