/// Account management and the atomic balance-delta primitive
pub mod account;

/// Budget caps and spending progress aggregation
pub mod budget;

/// Category management with one level of nesting
pub mod category;

/// Balance effect computation for every transaction kind
pub mod effects;

/// Transaction write path - create, update, delete, and queries
pub mod ledger;
