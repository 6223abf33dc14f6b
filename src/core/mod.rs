/// Monthly calculation engine
pub mod calculation;

/// Account credit ledger
pub mod credit;

/// Expense ledger with soft delete and filters
pub mod expense;

/// Income ledger
pub mod income;

/// Month-to-month inheritance shared by income and credits
pub mod ledger;

/// `YYYY-MM` month value type
pub mod month;

/// Per-user settings and their defaults
pub mod settings;

/// User lookup and provisioning
pub mod user;
