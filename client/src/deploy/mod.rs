//! Run-from-zip deployment

pub mod fsm;
pub mod identity;
pub mod run_from_zip;
pub mod validator;
