pub mod formatter;

pub use formatter::print_result;
