pub mod db_conn;

pub use db_conn::DbConn;
