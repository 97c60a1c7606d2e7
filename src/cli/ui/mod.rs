pub mod statement_view;
pub mod table_renderer;
