pub mod output_service;
pub mod pdf_service;

pub use output_service::OutputService;
pub use pdf_service::{find_program, PdfConverter, SofficeConverter};
