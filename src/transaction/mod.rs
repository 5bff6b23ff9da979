//! Transactions: the income and expense records at the heart of the app.

mod create;
mod db;
mod delete;
mod detail;
mod domain;
mod edit;
mod export;
mod list;

pub use create::create_transaction_endpoint;
pub use db::{
    SortOrder, TransactionQuery, count_transactions, create_transaction,
    create_transaction_table, delete_transaction, get_transaction, query_transactions,
    update_transaction,
};
pub use delete::delete_transaction_endpoint;
pub use detail::get_transaction_endpoint;
pub use domain::{
    DESCRIPTION_LIMIT, RecurringPeriod, Transaction, TransactionBuilder, TransactionID,
    TransactionType,
};
pub use edit::edit_transaction_endpoint;
pub use export::export_transactions;
pub use list::list_transactions;
