pub mod applications;
pub mod bank_reconciliation;
pub mod bank_transactions;
pub mod payments;
