//! Tests for run events and summaries

#[cfg(test)]
mod tests {
    use std::time::Duration;
    use tilemosaic::MosaicError;
    use tilemosaic::color::TileColor;
    use tilemosaic::pipeline::{RunEvent, RunSummary};
    use tilemosaic::resolve::{CacheStats, RowResult};
    use tilemosaic::spatial::Grid;

    fn summary() -> RunSummary {
        RunSummary {
            grid: Grid::new(2, 3),
            rows_emitted: 2,
            tiles_resolved: 4,
            cache: CacheStats::default(),
            elapsed: Duration::from_millis(5),
        }
    }

    // Tests only resolution and failure end a run
    // Verified by marking SamplingComplete as terminal
    #[test]
    fn test_terminal_events() {
        assert!(RunEvent::Resolved(summary()).is_terminal());
        assert!(RunEvent::Failed(MosaicError::Busy).is_terminal());

        let ongoing = [
            RunEvent::Progress {
                row: 0,
                col: 0,
                color: TileColor::SENTINEL,
            },
            RunEvent::RowSampled {
                row: 0,
                percent: 50.0,
            },
            RunEvent::SamplingComplete { rows: 2 },
            RunEvent::RowComplete(RowResult::new(0, 2)),
        ];
        assert!(ongoing.iter().all(|event| !event.is_terminal()));
    }

    // Tests summaries compare by value
    // Verified by deriving equality on the grid only
    #[test]
    fn test_summary_equality() {
        let mut other = summary();
        assert_eq!(summary(), other);
        other.tiles_resolved += 1;
        assert_ne!(summary(), other);
    }
}
