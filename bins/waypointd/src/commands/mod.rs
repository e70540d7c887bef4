pub mod genkey;
pub mod serve;
