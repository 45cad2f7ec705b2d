pub mod charts;
pub mod customers;
pub mod discount;
pub mod format;
pub mod overview;
pub mod panels;
pub mod regional;
pub mod trends;
