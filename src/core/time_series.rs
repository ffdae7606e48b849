//! TimeSeries data structure and transaction aggregation.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use std::collections::BTreeMap;

/// A raw sales transaction row as handed over by the data layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Date the transaction occurred.
    pub transaction_date: NaiveDate,
    /// Product identifier.
    pub product_id: u64,
    /// Product category identifier.
    pub category_id: u64,
    /// Units sold (non-negative).
    pub quantity_sold: f64,
}

/// A univariate time series with strictly increasing timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Create a new time series.
    ///
    /// Timestamps must be strictly increasing and match the values in length.
    pub fn new(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: timestamps.len(),
                got: values.len(),
            });
        }
        for i in 1..timestamps.len() {
            if timestamps[i] <= timestamps[i - 1] {
                return Err(ForecastError::TimestampError(
                    "timestamps must be strictly increasing".to_string(),
                ));
            }
        }
        Ok(Self { timestamps, values })
    }

    /// Get the number of observations.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Check if the series is empty.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Get timestamps.
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Get values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Look up the value at an exact timestamp.
    pub fn value_at(&self, timestamp: &DateTime<Utc>) -> Option<f64> {
        self.timestamps
            .binary_search(timestamp)
            .ok()
            .map(|i| self.values[i])
    }

    /// Extract a contiguous sub-series by observation index.
    pub fn slice(&self, start: usize, end: usize) -> Result<Self> {
        if start > end || end > self.len() {
            return Err(ForecastError::InvalidParameter(format!(
                "invalid slice range {start}..{end} for series of length {}",
                self.len()
            )));
        }
        Ok(Self {
            timestamps: self.timestamps[start..end].to_vec(),
            values: self.values[start..end].to_vec(),
        })
    }

    /// Split into a leading train segment and a trailing test segment of
    /// `test_len` observations.
    ///
    /// Train and test are contiguous, non-overlapping, and together cover
    /// the whole series; the test segment is always the suffix. Fails when
    /// the series has fewer than `test_len + 1` observations, which would
    /// leave nothing to train on.
    pub fn train_test_split(&self, test_len: usize) -> Result<(Self, Self)> {
        if self.len() < test_len + 1 {
            return Err(ForecastError::InsufficientData {
                needed: test_len + 1,
                got: self.len(),
            });
        }
        let cut = self.len() - test_len;
        Ok((self.slice(0, cut)?, self.slice(cut, self.len())?))
    }
}

/// Aggregate transactions into a monthly sales series.
///
/// Quantities are summed per calendar month; each month is stamped at
/// midnight UTC on its first day. Input order does not matter. Months with
/// no transactions are simply absent from the output.
pub fn monthly_sales(transactions: &[Transaction]) -> Result<TimeSeries> {
    if transactions.is_empty() {
        return Err(ForecastError::EmptyData);
    }

    let mut buckets: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for tx in transactions {
        if tx.quantity_sold < 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "negative quantity_sold {} for product {}",
                tx.quantity_sold, tx.product_id
            )));
        }
        let key = (tx.transaction_date.year(), tx.transaction_date.month());
        *buckets.entry(key).or_insert(0.0) += tx.quantity_sold;
    }

    let mut timestamps = Vec::with_capacity(buckets.len());
    let mut values = Vec::with_capacity(buckets.len());
    for ((year, month), total) in buckets {
        let ts = Utc
            .with_ymd_and_hms(year, month, 1, 0, 0, 0)
            .single()
            .ok_or_else(|| {
                ForecastError::TimestampError(format!("invalid month start {year}-{month:02}"))
            })?;
        timestamps.push(ts);
        values.push(total);
    }

    TimeSeries::new(timestamps, values)
}

/// Aggregate transactions into one monthly series per category.
///
/// Feeds the category-breakdown collaborator; each series follows the same
/// conventions as [`monthly_sales`].
pub fn monthly_sales_by_category(
    transactions: &[Transaction],
) -> Result<BTreeMap<u64, TimeSeries>> {
    if transactions.is_empty() {
        return Err(ForecastError::EmptyData);
    }

    let mut groups: BTreeMap<u64, Vec<Transaction>> = BTreeMap::new();
    for tx in transactions {
        groups.entry(tx.category_id).or_default().push(tx.clone());
    }

    let mut result = BTreeMap::new();
    for (category_id, rows) in groups {
        result.insert(category_id, monthly_sales(&rows)?);
    }
    Ok(result)
}
