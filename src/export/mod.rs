mod csv_export;

pub(crate) use csv_export::{write_matrix, write_matrix_to_path};
