mod reconciliation;

pub use reconciliation::start_reconciliation_task;
