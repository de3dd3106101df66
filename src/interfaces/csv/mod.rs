pub mod account_writer;
pub mod op_reader;

pub use account_writer::AccountWriter;
pub use op_reader::{OpKind, OpReader, OpRecord};
