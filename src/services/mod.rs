// Wastage calculation shared by writes and reports
pub mod wastage;

// Stores
pub mod batch_returns;
pub mod dispatches;

// Read-side reporting
pub mod reports;
