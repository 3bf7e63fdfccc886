use super::consts;
use super::stats::ZscoreTable;

///
/// Cutoffs for the outlier scan. A row is an outlier when its median is
/// zero, its count of high Z-scores sits in `1..zcount_limit`, and its
/// largest count exceeds `max_cutoff`.
///
pub struct OutlierThresholds {
    pub zcount_limit: u64,
    pub max_cutoff: u64,
}

impl Default for OutlierThresholds {
    fn default() -> Self {
        OutlierThresholds {
            zcount_limit: consts::DEFAULT_ZCOUNT_LIMIT,
            max_cutoff: consts::DEFAULT_MAX_CUTOFF,
        }
    }
}

///
/// Pick out the rows that look like a repeat expansion in a few samples:
/// absent from most of the cohort (median zero), elevated in only a handful
/// (ZCount below the limit but not zero), and strongly so (max above the
/// cutoff). Rows come back sorted by max count, largest first; ties keep
/// the table's row order.
///
pub fn select_outliers(table: &ZscoreTable, thresholds: &OutlierThresholds) -> ZscoreTable {
    let mut rows: Vec<_> = table
        .rows
        .iter()
        .filter(|(_, stats)| {
            stats.median == 0.0
                && stats.zcount > 0
                && stats.zcount < thresholds.zcount_limit
                && stats.max > thresholds.max_cutoff
        })
        .cloned()
        .collect();
    rows.sort_by(|a, b| b.1.max.cmp(&a.1.max));

    ZscoreTable {
        samples: table.samples.clone(),
        rows,
    }
}
