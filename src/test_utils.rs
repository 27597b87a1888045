use crate::types::{Aggregate, Channel, GroupKey, GroupTable, SensorRecord};

use std::collections::HashMap;

/// Relative tolerance used when comparing sums and means.
pub(crate) const TOLERANCE: f64 = 1e-6;

/// Create a SensorRecord with only device and date set.
pub(crate) fn get_test_record(device: &str, date: &str) -> SensorRecord {
    SensorRecord {
        device: device.to_string(),
        date: date.to_string(),
        ..Default::default()
    }
}

/// Create a SensorRecord with every channel set to the same value.
pub(crate) fn get_uniform_record(device: &str, date: &str, value: f64) -> SensorRecord {
    SensorRecord {
        temperature: value,
        humidity: value,
        luminosity: value,
        noise: value,
        eco2: value,
        etvoc: value,
        ..get_test_record(device, date)
    }
}

/// Create a deterministic record set covering `devices` x `months`, `per_group` records each.
///
/// Channel values vary by record index so that partitions see different extremes.
pub(crate) fn get_test_records(devices: usize, months: usize, per_group: usize) -> Vec<SensorRecord> {
    let mut records = Vec::new();
    let mut id = 0_i64;
    for n in 0..per_group {
        for month in 0..months {
            for device in 0..devices {
                let seed = (id * 7919 + 13) % 1000;
                records.push(SensorRecord {
                    id,
                    device: format!("device-{}", device),
                    count: n as i64,
                    date: format!("2024-{:02}-{:02} 12:00:00", month + 1, n % 28 + 1),
                    temperature: seed as f64 / 10.0 - 20.0,
                    humidity: (seed % 100) as f64 + 0.25,
                    luminosity: (seed * 3 % 1000) as f64,
                    noise: 30.0 + (seed % 70) as f64 / 3.0,
                    eco2: 400.0 + seed as f64,
                    etvoc: (seed % 250) as f64 * 0.1,
                    latitude: -22.9,
                    longitude: -43.2,
                });
                id += 1;
            }
        }
    }
    records
}

/// Aggregate records directly on the calling thread, without partitioning or merging.
pub(crate) fn direct_aggregate(records: &[SensorRecord]) -> HashMap<GroupKey, Aggregate> {
    let mut values: HashMap<GroupKey, Vec<f64>> = HashMap::new();
    for record in records {
        for channel in Channel::ALL {
            values
                .entry(GroupKey::new(&record.device, record.month(), channel))
                .or_default()
                .push(record.reading(channel));
        }
    }
    values
        .into_iter()
        .filter_map(|(key, values)| Aggregate::from_values(values).map(|agg| (key, agg)))
        .collect()
}

/// Assert that two floats are equal within a relative tolerance.
pub(crate) fn assert_close(expected: f64, actual: f64) {
    let scale = expected.abs().max(actual.abs()).max(1.0);
    assert!(
        (expected - actual).abs() <= TOLERANCE * scale,
        "expected {} but got {}",
        expected,
        actual
    );
}

/// Assert that a table matches a directly computed aggregation.
///
/// `min`, `max` and `count` must match exactly; `sum` within tolerance.
pub(crate) fn assert_table_matches(expected: &HashMap<GroupKey, Aggregate>, table: &GroupTable) {
    assert_eq!(expected.len(), table.len());
    for (key, want) in expected {
        let got = table
            .get(key.borrowed())
            .unwrap_or_else(|| panic!("missing group {:?}", key));
        assert_eq!(want.min(), got.min(), "min of {:?}", key);
        assert_eq!(want.max(), got.max(), "max of {:?}", key);
        assert_eq!(want.count(), got.count(), "count of {:?}", key);
        assert_close(want.sum(), got.sum());
    }
}
