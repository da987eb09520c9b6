mod repository;


pub use repository::FundRepository;
