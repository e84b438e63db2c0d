pub mod aggregate;
pub mod backfill;
pub mod energy;
pub mod ledger;
pub mod lookup;
pub mod month;
pub mod parser;
pub mod serving;
