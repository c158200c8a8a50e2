pub mod lead_repo;
pub mod website_detail_repo;

pub use lead_repo::LeadRepo;
pub use website_detail_repo::WebsiteDetailRepo;
