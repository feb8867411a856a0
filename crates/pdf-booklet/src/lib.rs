pub mod booklet;
pub mod constants;
mod document;
pub mod layout;
mod options;
mod pages;
pub mod render;
mod stats;
mod types;

pub use booklet::{
    BookletPlan, impose_document, load_pdf, make_booklet, make_booklet_file,
    make_booklet_file_in, plan_booklet, save_pdf,
};
pub use document::{Page, PageSequence};
pub use layout::{pad, plan_sheets, reorder};
pub use options::*;
pub use pages::{pad_document, read_pages, reorder_document, write_pages};
pub use stats::calculate_statistics;
pub use types::*;
