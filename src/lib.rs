pub mod jpegsort_core;
