//! Tests for run progress display

#[cfg(test)]
mod tests {
    use std::time::Duration;
    use tilemosaic::MosaicError;
    use tilemosaic::pipeline::{RunEvent, RunSummary};
    use tilemosaic::resolve::{CacheStats, RowResult};
    use tilemosaic::spatial::Grid;

    use tilemosaic::io::progress::ProgressManager;

    // Tests bars follow sampled and rendered rows
    // Verified by advancing the rendered bar on RowSampled
    #[test]
    fn test_observe_advances_bars() {
        let progress = ProgressManager::new();
        progress.initialize(4);

        progress.observe(&RunEvent::RowSampled {
            row: 0,
            percent: 25.0,
        });
        progress.observe(&RunEvent::RowSampled {
            row: 1,
            percent: 50.0,
        });
        progress.observe(&RunEvent::RowComplete(RowResult::new(0, 0)));

        assert_eq!(progress.rows_sampled(), 2);
        assert_eq!(progress.rows_rendered(), 1);
    }

    // Tests initialization resets earlier progress
    // Verified by keeping positions across initialize calls
    #[test]
    fn test_initialize_resets() {
        let progress = ProgressManager::default();
        progress.initialize(2);
        progress.observe(&RunEvent::RowComplete(RowResult::new(0, 0)));
        progress.initialize(3);

        assert_eq!(progress.rows_sampled(), 0);
        assert_eq!(progress.rows_rendered(), 0);
    }

    // Tests terminal events finish the bars without panicking
    // Verified by clearing bars before the final message
    #[test]
    fn test_terminal_events_finish() {
        let progress = ProgressManager::new();
        progress.initialize(1);
        progress.observe(&RunEvent::SamplingComplete { rows: 1 });
        progress.observe(&RunEvent::Resolved(RunSummary {
            grid: Grid::new(1, 1),
            rows_emitted: 1,
            tiles_resolved: 0,
            cache: CacheStats::default(),
            elapsed: Duration::ZERO,
        }));
        progress.finish();

        let failed = ProgressManager::new();
        failed.observe(&RunEvent::Failed(MosaicError::Busy));
        failed.finish();
    }
}
