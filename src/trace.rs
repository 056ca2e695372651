use macroquad::prelude::*;

/// Append-only record of the footprints left by committed motions.
///
/// Nothing is ever pruned. Callers that need bounded memory must sample or
/// cap the log themselves.
#[derive(Clone, Debug, Default)]
pub struct TraceLog {
    entries: Vec<Rect>,
}

impl TraceLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, rect: Rect) {
        self.entries.push(rect);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Rect] {
        &self.entries
    }

    /// Center of every recorded footprint, oldest first.
    pub fn centers(&self) -> Vec<Vec2> {
        self.entries.iter().map(|r| r.center()).collect()
    }

    /// Total distance along consecutive trace centers.
    pub fn path_length(&self) -> f32 {
        self.entries
            .windows(2)
            .map(|pair| pair[0].center().distance(pair[1].center()))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_duplicates_in_order() {
        let mut log = TraceLog::new();
        assert!(log.is_empty());
        log.record(Rect::new(0.0, 0.0, 10.0, 10.0));
        log.record(Rect::new(0.0, 0.0, 10.0, 10.0));
        log.record(Rect::new(30.0, 40.0, 10.0, 10.0));

        assert_eq!(log.len(), 3);
        assert_eq!(
            log.centers(),
            vec![vec2(5.0, 5.0), vec2(5.0, 5.0), vec2(35.0, 45.0)]
        );
    }

    #[test]
    fn path_length_ignores_in_place_entries() {
        let mut log = TraceLog::new();
        assert_eq!(log.path_length(), 0.0);
        log.record(Rect::new(0.0, 0.0, 2.0, 2.0));
        log.record(Rect::new(0.0, 0.0, 2.0, 2.0));
        log.record(Rect::new(3.0, 4.0, 2.0, 2.0));
        assert!((log.path_length() - 5.0).abs() < 1e-6);
    }
}
