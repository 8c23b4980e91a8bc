//! The headerless 3-field row format shared by the batch and worker surfaces.

pub mod rows;
