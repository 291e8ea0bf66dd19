pub mod checklist;
pub mod naming;

pub use checklist::{normalize_notes, ChecklistRecord, ChecklistRecordBuilder};
pub use naming::{base_filename, destination_slug, id_slug, pdf_sibling, resolve_output_path};
