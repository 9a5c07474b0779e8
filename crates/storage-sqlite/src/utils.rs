//! Helpers shared by the SQLite repositories.

/// Largest list bound into a single `IN (...)` clause. SQLite caps the
/// number of parameters per statement at 999 by default.
pub const SQLITE_MAX_PARAMS_CHUNK: usize = 500;

/// Splits `items` into slices small enough for one `IN (...)` query each.
pub fn chunk_for_sqlite<T>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunks(SQLITE_MAX_PARAMS_CHUNK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn large_id_lists_are_split() {
        let ids: Vec<i32> = (0..1201).collect();
        let sizes: Vec<usize> = chunk_for_sqlite(&ids).map(|c| c.len()).collect();
        assert_eq!(sizes, vec![500, 500, 201]);
        assert_eq!(chunk_for_sqlite::<i32>(&[]).count(), 0);
    }
}
