pub mod a001_customer;
pub mod a002_measurement;
pub mod a003_order;
pub mod a004_expense;
