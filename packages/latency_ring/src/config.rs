use std::num::NonZero;
use std::time::Duration;

use new_zealand::nz;
use toml::{Table, Value};
use tracing::warn;

use crate::{Error, ExtremaTracking};

/// Default number of samples kept in the buffer.
pub const DEFAULT_CAPACITY: NonZero<usize> = nz!(50);

/// Default number of underlying ticks between two recorded samples.
///
/// A servo latency producer typically records only every fifth command it observes, keeping the
/// measurement overhead off most control cycles.
pub const DEFAULT_SAMPLE_INTERVAL: NonZero<u32> = nz!(5);

/// Default cadence at which a status reporter is expected to summarize the buffer.
pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_millis(2500);

const KEY_CAPACITY: &str = "capacity";
const KEY_SAMPLE_INTERVAL: &str = "sample_interval";
const KEY_EXTREMA: &str = "extrema";

/// Validated configuration of a [`LatencyStatsBuffer`][crate::LatencyStatsBuffer].
///
/// A configuration can be created in code via [`BufferConfig::new()`], loaded from a TOML
/// document via [`BufferConfig::from_toml_str()`] or taken as-is from [`BufferConfig::default()`].
///
/// # Example
///
/// ```
/// use latency_ring::{BufferConfig, ExtremaTracking, LatencyStatsBuffer};
///
/// let config = BufferConfig::from_toml_str(
///     r#"
///     capacity = 100
///     sample_interval = 1
///     extrema = "window"
///     "#,
/// )
/// .unwrap();
///
/// assert_eq!(config.capacity().get(), 100);
/// assert_eq!(config.extrema(), ExtremaTracking::Window);
///
/// let buffer = LatencyStatsBuffer::from_config(&config);
/// assert_eq!(buffer.capacity(), 100);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BufferConfig {
    capacity: NonZero<usize>,
    sample_interval: NonZero<u32>,
    extrema: ExtremaTracking,
}

impl BufferConfig {
    /// Creates a configuration with the given capacity and sample interval, using the default
    /// [`ExtremaTracking`] mode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroCapacity`] if `capacity` is zero and [`Error::ZeroSampleInterval`]
    /// if `sample_interval` is zero.
    pub fn new(capacity: usize, sample_interval: u32) -> crate::Result<Self> {
        let capacity = NonZero::new(capacity).ok_or(Error::ZeroCapacity)?;
        let sample_interval = NonZero::new(sample_interval).ok_or(Error::ZeroSampleInterval)?;

        Ok(Self {
            capacity,
            sample_interval,
            extrema: ExtremaTracking::default(),
        })
    }

    /// Returns the configuration with the extrema tracking mode replaced.
    #[must_use]
    pub fn with_extrema(self, extrema: ExtremaTracking) -> Self {
        Self { extrema, ..self }
    }

    /// Parses a configuration from a flat TOML document.
    ///
    /// Recognized keys are `capacity` (integer), `sample_interval` (integer) and `extrema`
    /// (`"insertion"` or `"window"`). Missing keys take their default values. Unknown keys are
    /// rejected so that typos do not silently fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigSyntax`] if the document is not valid TOML and
    /// [`Error::InvalidConfig`] if a key is unknown or holds an unacceptable value. Zero values
    /// produce the same errors as [`BufferConfig::new()`].
    pub fn from_toml_str(document: &str) -> crate::Result<Self> {
        parse_document(document).inspect_err(|error| {
            warn!(%error, "rejected latency buffer configuration");
        })
    }

    /// Maximum number of samples resident in the buffer.
    #[must_use]
    pub fn capacity(&self) -> NonZero<usize> {
        self.capacity
    }

    /// Number of underlying ticks between two recorded samples, used for throughput.
    #[must_use]
    pub fn sample_interval(&self) -> NonZero<u32> {
        self.sample_interval
    }

    /// How the buffer tracks the minimum and maximum latency.
    #[must_use]
    pub fn extrema(&self) -> ExtremaTracking {
        self.extrema
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            extrema: ExtremaTracking::default(),
        }
    }
}

fn parse_document(document: &str) -> crate::Result<BufferConfig> {
    let table: Table = toml::from_str(document)?;

    let mut capacity = DEFAULT_CAPACITY.get();
    let mut sample_interval = DEFAULT_SAMPLE_INTERVAL.get();
    let mut extrema = ExtremaTracking::default();

    for (key, value) in &table {
        match key.as_str() {
            KEY_CAPACITY => capacity = integer_value(key, value)?,
            KEY_SAMPLE_INTERVAL => sample_interval = integer_value(key, value)?,
            KEY_EXTREMA => {
                extrema = value
                    .as_str()
                    .ok_or_else(|| Error::invalid_config(key, "must be a string"))?
                    .parse()?;
            }
            _ => return Err(Error::invalid_config(key, "unknown configuration key")),
        }
    }

    BufferConfig::new(capacity, sample_interval).map(|config| config.with_extrema(extrema))
}

fn integer_value<T>(key: &str, value: &Value) -> crate::Result<T>
where
    T: TryFrom<i64>,
    T::Error: std::fmt::Display,
{
    let integer = value
        .as_integer()
        .ok_or_else(|| Error::invalid_config(key, "must be an integer"))?;

    T::try_from(integer)
        .map_err(|error| Error::invalid_config(key, format!("{integer} is out of range: {error}")))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(BufferConfig: Send, Sync, Copy, Debug);

    #[test]
    fn default_matches_constants() {
        let config = BufferConfig::default();

        assert_eq!(config.capacity(), DEFAULT_CAPACITY);
        assert_eq!(config.sample_interval(), DEFAULT_SAMPLE_INTERVAL);
        assert_eq!(config.extrema(), ExtremaTracking::Insertion);
    }

    #[test]
    fn new_rejects_zero_values() {
        assert!(matches!(BufferConfig::new(0, 5), Err(Error::ZeroCapacity)));
        assert!(matches!(
            BufferConfig::new(5, 0),
            Err(Error::ZeroSampleInterval)
        ));
    }

    #[test]
    fn with_extrema_replaces_only_the_mode() {
        let config = BufferConfig::new(7, 3)
            .unwrap()
            .with_extrema(ExtremaTracking::Window);

        assert_eq!(config.capacity().get(), 7);
        assert_eq!(config.sample_interval().get(), 3);
        assert_eq!(config.extrema(), ExtremaTracking::Window);
    }

    #[test]
    fn empty_document_gives_defaults() {
        assert_eq!(
            BufferConfig::from_toml_str("").unwrap(),
            BufferConfig::default()
        );
    }

    #[test]
    fn full_document_is_parsed() {
        let config = BufferConfig::from_toml_str(
            r#"
            capacity = 8
            sample_interval = 2
            extrema = "window"
            "#,
        )
        .unwrap();

        assert_eq!(config.capacity().get(), 8);
        assert_eq!(config.sample_interval().get(), 2);
        assert_eq!(config.extrema(), ExtremaTracking::Window);
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = BufferConfig::from_toml_str("capacity = 12").unwrap();

        assert_eq!(config.capacity().get(), 12);
        assert_eq!(config.sample_interval(), DEFAULT_SAMPLE_INTERVAL);
        assert_eq!(config.extrema(), ExtremaTracking::Insertion);
    }

    #[test]
    fn zero_capacity_in_document_is_rejected() {
        assert!(matches!(
            BufferConfig::from_toml_str("capacity = 0"),
            Err(Error::ZeroCapacity)
        ));
    }

    #[test]
    fn negative_capacity_is_rejected() {
        let error = BufferConfig::from_toml_str("capacity = -1").unwrap_err();

        assert!(matches!(error, Error::InvalidConfig { ref key, .. } if key == "capacity"));
    }

    #[test]
    fn oversized_sample_interval_is_rejected() {
        let error = BufferConfig::from_toml_str("sample_interval = 99999999999").unwrap_err();

        assert!(matches!(error, Error::InvalidConfig { ref key, .. } if key == "sample_interval"));
    }

    #[test]
    fn wrong_types_are_rejected() {
        let error = BufferConfig::from_toml_str(r#"capacity = "fifty""#).unwrap_err();
        assert!(matches!(error, Error::InvalidConfig { ref key, .. } if key == "capacity"));

        let error = BufferConfig::from_toml_str("extrema = 3").unwrap_err();
        assert!(matches!(error, Error::InvalidConfig { ref key, .. } if key == "extrema"));
    }

    #[test]
    fn unknown_extrema_mode_is_rejected() {
        let error = BufferConfig::from_toml_str(r#"extrema = "exact""#).unwrap_err();

        assert!(matches!(error, Error::InvalidConfig { ref key, .. } if key == "extrema"));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let error = BufferConfig::from_toml_str("capacityy = 10").unwrap_err();

        assert!(matches!(error, Error::InvalidConfig { ref key, .. } if key == "capacityy"));
    }

    #[test]
    fn malformed_document_is_syntax_error() {
        assert!(matches!(
            BufferConfig::from_toml_str("capacity = = 3"),
            Err(Error::ConfigSyntax(_))
        ));
    }
}
