//! Sensor Data Preprocessing
//!
//! Scaling, smoothing, rolling statistics, gradients, correlation and
//! z-score outlier removal for sensor channels and feature matrices.

mod correlation;
mod error;
mod filter;
mod normalizer;
mod outliers;
mod rolling;

pub use correlation::correlation_matrix;
pub use error::PreprocessError;
pub use filter::{gradient, moving_average};
pub use normalizer::{MinMaxScaler, StandardScaler};
pub use outliers::{remove_outliers, zscore_filter, zscores, OutlierReport, Z_SCORE_THRESHOLD};
pub use rolling::{
    rolling_max, rolling_mean, rolling_min, rolling_std, RollingWindow, FILTER_WINDOW,
    ROLLING_STATS_WINDOW, SMOOTHING_WINDOW,
};
