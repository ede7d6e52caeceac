pub mod card;
pub mod common;
pub mod table_view;
