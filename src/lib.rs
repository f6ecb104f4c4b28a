//! Correlation analysis and figure generation for calcium-imaging
//! trace reconstructions at varying spatial decimation levels.
//!
//! The crate loads precomputed `N x T` trace matrices from `.npy`
//! files, aligns them against the undecimated ground truth, computes
//! per-component Pearson/Spearman correlation matrices and renders the
//! publication figure set plus machine-readable summaries.

pub mod fig;
pub mod input;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod stats;
