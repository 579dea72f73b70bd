use chrono::NaiveDateTime;

/// Source of "now" in UTC, swappable for fixed time in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}
