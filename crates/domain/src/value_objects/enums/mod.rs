pub mod application_statuses;
pub mod payment_methods;
pub mod payment_statuses;
pub mod reconciliation_statuses;
