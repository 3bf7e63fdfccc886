//! # TRhist: *<small>Tools for combining and summarizing tandem repeat histogram matrices.</small>*
//!
//! `trhist` is a rust crate for the aggregation half of a tandem repeat detection pipeline.
//! Upstream tools scan fastq chunks for reads made of tandem repeats and emit per-chunk
//! count histograms; this crate collates those chunks into one matrix per sample, joins a
//! chosen histogram column across a whole cohort, and scores every repeat unit row for
//! outlier samples that may carry a repeat expansion.
//!
pub mod collate;
pub mod common;
pub mod multisample;
pub mod zscores;
