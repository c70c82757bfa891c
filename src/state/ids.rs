use chrono::Local;

/// Timestamp-based id source. Ids are the current Unix time in milliseconds,
/// bumped so that two ids minted in the same millisecond never collide.
#[derive(Debug, Default)]
pub struct IdGen {
    last: i64,
}

impl IdGen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a fixed value instead of the clock's past
    pub fn starting_at(last: i64) -> Self {
        IdGen { last }
    }

    pub fn next_millis(&mut self) -> i64 {
        let now = Local::now().timestamp_millis();
        self.last = now.max(self.last + 1);
        self.last
    }

    pub fn task(&mut self) -> String {
        self.next_millis().to_string()
    }

    pub fn project(&mut self) -> String {
        self.next_millis().to_string()
    }

    pub fn folder(&mut self) -> String {
        format!("f{}", self.next_millis())
    }

    pub fn file(&mut self) -> String {
        format!("file{}", self.next_millis())
    }

    pub fn user(&mut self) -> String {
        format!("u{}", self.next_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_strictly_increasing() {
        let mut ids = IdGen::new();
        let a = ids.next_millis();
        let b = ids.next_millis();
        let c = ids.next_millis();
        assert!(a < b && b < c);
    }

    #[test]
    fn ids_never_go_backwards() {
        let far_future = Local::now().timestamp_millis() + 1_000_000;
        let mut ids = IdGen::starting_at(far_future);
        assert_eq!(ids.next_millis(), far_future + 1);
    }

    #[test]
    fn prefixes() {
        let mut ids = IdGen::new();
        assert!(ids.folder().starts_with('f'));
        assert!(ids.file().starts_with("file"));
        assert!(ids.user().starts_with('u'));
        assert!(ids.task().chars().all(|c| c.is_ascii_digit()));
    }
}
