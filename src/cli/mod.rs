pub mod menu;
pub mod parse;

pub use menu::{Menu, MenuExit};
pub use parse::{parse_amount, parse_invoice_list, InputError};
