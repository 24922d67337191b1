pub mod code;
pub mod export;
pub mod init;
pub mod ledger;
pub mod open;
pub mod reset;
pub mod run;
pub mod validate;
