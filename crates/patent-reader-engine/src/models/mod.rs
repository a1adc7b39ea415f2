pub mod patent_file;

pub use patent_file::PatentFile;
