pub mod header;
pub mod kpi_cards;
pub mod share_bar;
