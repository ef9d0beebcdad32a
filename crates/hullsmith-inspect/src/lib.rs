//! Region file inspection: decode a region and summarize its contents.

pub mod report;
