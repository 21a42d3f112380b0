pub mod check;
pub mod init;
pub mod leaves;
pub mod root;
pub mod shifts;
