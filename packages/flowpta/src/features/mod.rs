//! Analysis features

pub mod points_to;
