//! Randomized workloads over [`IntSet`], shared by the benchmark binary and
//! the tests.

use std::time::{Duration, Instant};

use hdrhistogram::Histogram;
use rand::Rng;
use tracing::info;

use crate::intset::intset::IntSet;
use crate::intset::lib::Encoding;
use crate::intset::INTSET_HEADER_SIZE;

#[derive(Debug)]
pub struct StressReport {
    pub name: &'static str,
    pub ops: usize,
    pub elapsed: Duration,
    /// per-op latency in nanoseconds
    pub latency: Histogram<u64>,
    pub final_len: usize,
    pub final_encoding: Encoding,
}

impl StressReport {
    fn new(name: &'static str) -> crate::Result<Self> {
        Ok(Self {
            name,
            ops: 0,
            elapsed: Duration::ZERO,
            latency: Histogram::<u64>::new_with_bounds(1, 60_000_000_000, 3)?,
            final_len: 0,
            final_encoding: Encoding::Int16,
        })
    }

    fn record(&mut self, start: Instant) {
        let nanos = start.elapsed().as_nanos().max(1) as u64;
        self.latency.saturating_record(nanos);
        self.ops += 1;
    }

    pub fn ops_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.ops as f64 / secs
    }
}

/// Builds a set of `size` random draws masked to `bits` bits. Duplicates are
/// dropped, so the result may hold fewer than `size` elements.
pub fn create_set<R: Rng + ?Sized>(rng: &mut R, bits: u32, size: usize) -> IntSet {
    let mask = mask(bits);
    let mut is = IntSet::new();
    for _ in 0..size {
        let value = rng.random::<u64>() & mask;
        is = is.add(value as i64).0;
    }
    is
}

fn mask(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Strict ordering, element widths and exact blob size.
pub fn check_consistency(is: &IntSet) -> bool {
    let mut prev: Option<i64> = None;
    for value in is {
        if prev.is_some_and(|p| p >= value) || Encoding::for_value(value) > is.encoding() {
            return false;
        }
        prev = Some(value);
    }
    is.blob_len() == INTSET_HEADER_SIZE + is.len() * is.encoding().width()
}

pub fn stress_lookups<R: Rng + ?Sized>(
    rng: &mut R,
    is: &IntSet,
    bits: u32,
    lookups: usize,
) -> crate::Result<StressReport> {
    let mut report = StressReport::new("lookups")?;
    let mask = mask(bits);
    let mut hits = 0usize;
    let st = Instant::now();
    for _ in 0..lookups {
        let value = (rng.random::<u64>() & mask) as i64;
        let op = Instant::now();
        if is.find(value) {
            hits += 1;
        }
        report.record(op);
    }
    report.elapsed = st.elapsed();
    report.final_len = is.len();
    report.final_encoding = is.encoding();
    info!(lookups, hits, set_len = is.len(), elapsed = ?report.elapsed, "stress lookups done");
    Ok(report)
}

/// Alternates a random add and a random delete, checking each result.
pub fn stress_add_delete<R: Rng + ?Sized>(
    rng: &mut R,
    rounds: usize,
    range: i64,
) -> crate::Result<StressReport> {
    if range <= 0 {
        return Err(format!("add/delete range must be positive, got {}", range).into());
    }
    let mut report = StressReport::new("add-delete")?;
    let mut is = IntSet::new();
    let st = Instant::now();
    for _ in 0..rounds {
        let v1 = rng.random_range(-range..range);
        let op = Instant::now();
        is = is.add(v1).0;
        report.record(op);
        if !is.find(v1) {
            return Err(format!("value {} missing after add", v1).into());
        }

        let v2 = rng.random_range(-range..range);
        let op = Instant::now();
        is = is.remove(v2).0;
        report.record(op);
        if is.find(v2) {
            return Err(format!("value {} present after delete", v2).into());
        }
    }
    report.elapsed = st.elapsed();
    if !check_consistency(&is) {
        return Err("intset inconsistent after add/delete".into());
    }
    report.final_len = is.len();
    report.final_encoding = is.encoding();
    info!(rounds, set_len = is.len(), elapsed = ?report.elapsed, "stress add+delete done");
    Ok(report)
}

/// Forces every upgrade path (16->32, 16->64, 32->64, both signs) on sets
/// of `size` small elements.
pub fn stress_upgrades<R: Rng + ?Sized>(rng: &mut R, size: usize) -> crate::Result<StressReport> {
    let mut report = StressReport::new("upgrade")?;
    let st = Instant::now();
    let cases: [(i64, i64); 6] = [
        (0, 65535),
        (0, -65535),
        (0, 4294967295),
        (0, -4294967295),
        (65535, 4294967295),
        (65535, -4294967295),
    ];
    for (seed_value, wide) in cases {
        let mut is = create_set(rng, 14, size);
        if seed_value != 0 {
            is = is.add(seed_value).0;
        }
        let before = is.encoding();
        let op = Instant::now();
        let (next, added) = is.add(wide);
        report.record(op);
        is = next;
        if !added || is.encoding() <= before || !is.find(wide) || !check_consistency(&is) {
            return Err(format!("upgrade from {} with {} failed", before, wide).into());
        }
        report.final_len = is.len();
        report.final_encoding = is.encoding();
    }
    report.elapsed = st.elapsed();
    Ok(report)
}

#[cfg(test)]
mod test {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn created_set_respects_mask() {
        let mut rng = StdRng::seed_from_u64(11);
        let is = create_set(&mut rng, 10, 500);
        assert!(!is.is_empty());
        assert!(is.len() <= 500);
        assert!(is.iter().all(|v| (0..1024).contains(&v)));
        assert!(check_consistency(&is));
    }

    #[test]
    fn wide_sets_use_int64() {
        let mut rng = StdRng::seed_from_u64(12);
        let is = create_set(&mut rng, 40, 200);
        assert_eq!(is.encoding(), Encoding::Int64);
        assert!(check_consistency(&is));
    }

    #[test]
    fn lookups_report() {
        let mut rng = StdRng::seed_from_u64(13);
        let is = create_set(&mut rng, 12, 300);
        let report = stress_lookups(&mut rng, &is, 12, 1000).unwrap();
        assert_eq!(report.ops, 1000);
        assert_eq!(report.latency.len(), 1000);
        assert_eq!(report.final_len, is.len());
    }

    #[test]
    fn add_delete_report() {
        let mut rng = StdRng::seed_from_u64(14);
        let report = stress_add_delete(&mut rng, 2000, 0xfff).unwrap();
        assert_eq!(report.ops, 4000);
        assert_eq!(report.final_encoding, Encoding::Int16);
    }

    #[test]
    fn add_delete_rejects_empty_range() {
        let mut rng = StdRng::seed_from_u64(15);
        assert!(stress_add_delete(&mut rng, 10, 0).is_err());
    }

    #[test]
    fn upgrades_report() {
        let mut rng = StdRng::seed_from_u64(16);
        let report = stress_upgrades(&mut rng, 50).unwrap();
        assert_eq!(report.ops, 6);
        assert_eq!(report.final_encoding, Encoding::Int64);
    }

    #[test]
    fn consistency_detects_nothing_wrong_on_empty() {
        assert!(check_consistency(&IntSet::new()));
    }
}
