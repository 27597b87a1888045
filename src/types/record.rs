//! Sensor records
//!
//! A [SensorRecord] is a single validated line of sensor input. Records are produced by the
//! [source](crate::source) module and are read-only as far as the aggregation engine is concerned.

use crate::types::Channel;

/// Number of leading characters of a date that identify its calendar month (`YYYY-MM`).
pub const MONTH_PREFIX_LEN: usize = 7;

/// A single sensor reading for one device at one point in time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SensorRecord {
    /// Record identifier
    pub id: i64,
    /// Device identifier
    pub device: String,
    /// Device-side sample counter
    pub count: i64,
    /// Timestamp of the reading, starting with a `YYYY-MM` calendar month
    pub date: String,
    pub temperature: f64,
    pub humidity: f64,
    pub luminosity: f64,
    pub noise: f64,
    pub eco2: f64,
    pub etvoc: f64,
    pub latitude: f64,
    pub longitude: f64,
}

impl SensorRecord {
    /// Returns the calendar month of the reading.
    ///
    /// This is the first [MONTH_PREFIX_LEN] characters of the date, taken verbatim. A date shorter
    /// than that is returned whole without padding.
    pub fn month(&self) -> &str {
        match self.date.char_indices().nth(MONTH_PREFIX_LEN) {
            Some((end, _)) => &self.date[..end],
            None => &self.date,
        }
    }

    /// Returns the value of one of the six sensor channels.
    pub fn reading(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Temperature => self.temperature,
            Channel::Humidity => self.humidity,
            Channel::Luminosity => self.luminosity,
            Channel::Noise => self.noise,
            Channel::Eco2 => self.eco2,
            Channel::Etvoc => self.etvoc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_date(date: &str) -> SensorRecord {
        SensorRecord {
            date: date.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn month_of_full_timestamp() {
        let record = record_with_date("2024-03-15 10:22:01");
        assert_eq!("2024-03", record.month());
    }

    #[test]
    fn month_of_exact_prefix() {
        let record = record_with_date("2024-11");
        assert_eq!("2024-11", record.month());
    }

    #[test]
    fn month_of_short_date_is_verbatim() {
        let record = record_with_date("2024");
        assert_eq!("2024", record.month());
    }

    #[test]
    fn month_of_empty_date() {
        let record = record_with_date("");
        assert_eq!("", record.month());
    }

    #[test]
    fn month_respects_char_boundaries() {
        // Multi-byte characters must not be split.
        let record = record_with_date("ñññññññññ");
        assert_eq!("ñññññññ", record.month());
    }

    #[test]
    fn reading_per_channel() {
        let record = SensorRecord {
            temperature: 1.0,
            humidity: 2.0,
            luminosity: 3.0,
            noise: 4.0,
            eco2: 5.0,
            etvoc: 6.0,
            latitude: 7.0,
            longitude: 8.0,
            ..Default::default()
        };
        let readings = Channel::ALL.map(|channel| record.reading(channel));
        assert_eq!([1.0, 2.0, 3.0, 4.0, 5.0, 6.0], readings);
    }
}
