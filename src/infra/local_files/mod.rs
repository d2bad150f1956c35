// Local mirror file handling.

pub mod mirror_file;

pub use mirror_file::MirrorFileTransfer;
