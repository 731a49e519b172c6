pub mod bank_statements;
pub mod enums;
pub mod payments;
pub mod reconciliation;
