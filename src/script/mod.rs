pub mod table_rows_script;

pub use table_rows_script::{NETWORK_ACTIVITY_SCRIPT, TABLE_ROWS_SCRIPT};
