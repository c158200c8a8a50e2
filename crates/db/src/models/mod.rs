pub mod lead;
pub mod website_detail;
