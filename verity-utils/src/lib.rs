/// Twilight-backed channel history and channel lookup.
pub mod history;
/// Deferred interaction responses and follow-ups.
pub mod interaction;
/// Pure parser helpers.
pub mod parse;
