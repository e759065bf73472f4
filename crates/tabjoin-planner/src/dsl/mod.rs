//! Job file front-ends.

pub mod yaml;
